//! Calendar fields from Unix time at a fixed UTC offset.

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallTime {
    pub year: i64,
    /// 1-based.
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// 0 is Sunday.
    pub weekday: u32,
}

impl WallTime {
    pub fn from_epoch(secs: f64, offset_minutes: i32) -> Self {
        let t = secs.floor() as i64 + i64::from(offset_minutes) * 60;
        let days = t.div_euclid(86_400);
        let rem = t.rem_euclid(86_400);

        // Days to proleptic Gregorian date, with years starting in March.
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u32,
            minute: (rem % 3600 / 60) as u32,
            second: (rem % 60) as u32,
            // 1970-01-01 was a Thursday.
            weekday: (days + 4).rem_euclid(7) as u32,
        }
    }

    /// `3:04`, hours 1-12.
    pub fn hm_12h(&self) -> String {
        let h = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{h}:{:02}", self.minute)
    }

    pub fn am_pm(&self) -> &'static str {
        if self.hour < 12 { "am" } else { "pm" }
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAYS[self.weekday as usize % 7]
    }

    pub fn month_name(&self) -> &'static str {
        MONTHS[(self.month as usize + 11) % 12]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let t = WallTime::from_epoch(0.0, 0);
        assert_eq!((t.year, t.month, t.day), (1970, 1, 1));
        assert_eq!(t.weekday_name(), "THU");
        assert_eq!(t.hm_12h(), "12:00");
        assert_eq!(t.am_pm(), "am");
    }

    #[test]
    fn test_known_instant() {
        // 2023-11-14 22:13:20 UTC, a Tuesday.
        let t = WallTime::from_epoch(1_700_000_000.0, 0);
        assert_eq!((t.year, t.month, t.day), (2023, 11, 14));
        assert_eq!((t.hour, t.minute, t.second), (22, 13, 20));
        assert_eq!(t.weekday_name(), "TUE");
        assert_eq!(t.month_name(), "NOV");
        assert_eq!(t.hm_12h(), "10:13");
        assert_eq!(t.am_pm(), "pm");
    }

    #[test]
    fn test_offset_crosses_midnight() {
        // Seven hours behind UTC.
        let t = WallTime::from_epoch(1_700_000_000.0 + 3.0 * 3600.0, -420);
        assert_eq!((t.day, t.hour), (14, 18));
        let t = WallTime::from_epoch(60.0, -60);
        assert_eq!((t.year, t.month, t.day, t.hour), (1969, 12, 31, 23));
        assert_eq!(t.weekday_name(), "WED");
    }
}
