//! UTC datetime utilities without timezone dependencies.
//!
//! Build artifacts are named after the UTC minute they were produced in,
//! e.g. `build.2024.06.15.14.30`.

use std::time::{SystemTime, UNIX_EPOCH};

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Current wall-clock time. A clock before 1970 reads as the epoch.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix_secs(secs)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn from_unix_secs(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;
        let (year, month, day) = days_to_ymd(days);
        Self {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: (rem / 3600) as u8,
            minute: (rem / 60 % 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Minute-resolution stamp: `YYYY.MM.DD.HH.MM`
    pub fn to_build_stamp(self) -> String {
        format!(
            "{:04}.{:02}.{:02}.{:02}.{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

/// Basename shared by every artifact of one build.
pub fn build_basename(at: DateTimeUtc) -> String {
    format!("build.{}", at.to_build_stamp())
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn days_to_ymd(days: i64) -> (i64, u32, u32) {
    const DAYS_TO_1970: i64 = 719_468;

    let z = days + DAYS_TO_1970;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097) as u32;

    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = i64::from(yoe) + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);

    // March = 0
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };

    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_to_ymd() {
        assert_eq!(days_to_ymd(0), (1970, 1, 1));
        assert_eq!(days_to_ymd(59), (1970, 3, 1));
        // 2000-02-29 (leap day)
        assert_eq!(days_to_ymd(11_016), (2000, 2, 29));
        assert_eq!(days_to_ymd(19_889), (2024, 6, 15));
    }

    #[test]
    fn test_from_unix_secs() {
        // 2024-06-15T14:30:45Z
        let dt = DateTimeUtc::from_unix_secs(1_718_461_845);
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
    }

    #[test]
    fn test_build_basename() {
        let dt = DateTimeUtc::new(2024, 6, 5, 4, 3, 59);
        assert_eq!(build_basename(dt), "build.2024.06.05.04.03");
    }

    #[test]
    fn test_now_is_after_epoch() {
        assert!(DateTimeUtc::now().year >= 2024);
    }
}
