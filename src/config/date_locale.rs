use crate::error::{
    BadDateTimeFormatterSnafu, InvalidLocaleSnafu, InvalidTimezoneSnafu, RegistrarResult,
    ZoneDateSnafu,
};
use icu::{
    datetime::{
        DateTimeFormatter, DateTimeFormatterPreferences,
        fieldsets::{YMD, YMDET},
        options::{Alignment, TimePrecision},
    },
    locale::Locale,
    time::{ZonedDateTime, TimeZoneInfo, zone::models::Full},
    calendar::Iso,
};
use jiff::{Timestamp, Zoned, civil::Date, tz::TimeZone};
use jiff_icu::ConvertFrom;
use snafu::ResultExt;

#[derive(Debug, Clone)]
pub struct DateLocaleConfig {
    pub timezone: TimeZone,
    pub locale: Locale,
    dtf_prefs: DateTimeFormatterPreferences,
}

#[derive(Copy, Clone, Debug)]
pub enum DateFormat {
    ShortYMDET,
    ShortYMD,
}

impl DateLocaleConfig {
    pub fn new(timezone: String, locale: String) -> RegistrarResult<Self> {
        let timezone = TimeZone::get(&timezone).context(InvalidTimezoneSnafu { tz: timezone })?;
        let locale =
            Locale::try_from_str(&locale).context(InvalidLocaleSnafu { provided: locale })?;

        let mut dtf_prefs = DateTimeFormatterPreferences::default();
        dtf_prefs.locale_preferences = (&locale).into();

        Ok(Self {
            timezone,
            locale,
            dtf_prefs,
        })
    }

    pub fn today(&self) -> Date {
        Zoned::now().with_time_zone(self.timezone.clone()).date()
    }

    //TODO: cache the two formatters instead of building one per call
    pub fn format(
        &self,
        zoned: &Zoned,
        date_format: DateFormat,
        set_to_global_timezone: bool,
    ) -> RegistrarResult<String> {
        let zdt: ZonedDateTime<Iso, TimeZoneInfo<Full>> = if set_to_global_timezone {
            let new_tz = zoned.with_time_zone(self.timezone.clone());
            ZonedDateTime::convert_from(&new_tz)
        } else {
            ZonedDateTime::convert_from(zoned)
        };

        Ok(match date_format {
            DateFormat::ShortYMDET => DateTimeFormatter::try_new(self.dtf_prefs, {
                let mut fieldset = YMDET::short();
                fieldset.alignment = Some(Alignment::Column);
                fieldset.time_precision = Some(TimePrecision::Minute);
                fieldset
            })
            .context(BadDateTimeFormatterSnafu)?
            .format(&zdt)
            .to_string(),
            DateFormat::ShortYMD => DateTimeFormatter::try_new(self.dtf_prefs, {
                let mut fieldset = YMD::short();
                fieldset.alignment = Some(Alignment::Column);
                fieldset
            })
            .context(BadDateTimeFormatterSnafu)?
            .format(&zdt)
            .to_string(),
        })
    }

    ///a calendar date stays on its own day whatever the configured timezone
    pub fn calendar_date(&self, date: Date) -> RegistrarResult<String> {
        let zoned = date.to_zoned(TimeZone::UTC).context(ZoneDateSnafu)?;
        self.format(&zoned, DateFormat::ShortYMD, false)
    }

    pub fn timestamp(&self, timestamp: Timestamp) -> RegistrarResult<String> {
        self.format(
            &timestamp.to_zoned(self.timezone.clone()),
            DateFormat::ShortYMDET,
            false,
        )
    }

    pub fn calendar_date_or_iso(&self, date: Date) -> String {
        self.calendar_date(date).unwrap_or_else(|e| {
            warn!(?e, %date, "Unable to format date for locale");
            date.to_string()
        })
    }

    pub fn timestamp_or_iso(&self, timestamp: Timestamp) -> String {
        self.timestamp(timestamp).unwrap_or_else(|e| {
            warn!(?e, %timestamp, "Unable to format timestamp for locale");
            timestamp.to_string()
        })
    }
}
