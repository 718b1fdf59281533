use std::fmt;

use chrono::NaiveDate;

use crate::constants::DEADLINE_SETTINGS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeadlineStatus {
    Expired,
    Today,
    DaysLeft(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    Soon,
    Comfortable,
}

impl DeadlineStatus {
    pub fn for_date(deadline: NaiveDate, today: NaiveDate) -> Self {
        let days = (deadline - today).num_days();
        if days < 0 {
            DeadlineStatus::Expired
        } else if days == 0 {
            DeadlineStatus::Today
        } else {
            DeadlineStatus::DaysLeft(days)
        }
    }

    pub fn urgency(self) -> Urgency {
        match self {
            DeadlineStatus::Expired => Urgency::Overdue,
            DeadlineStatus::Today => Urgency::Soon,
            DeadlineStatus::DaysLeft(days) if days <= DEADLINE_SETTINGS.soon_days => Urgency::Soon,
            DeadlineStatus::DaysLeft(_) => Urgency::Comfortable,
        }
    }
}

impl fmt::Display for DeadlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineStatus::Expired => write!(f, "Expired"),
            DeadlineStatus::Today => write!(f, "Today"),
            DeadlineStatus::DaysLeft(1) => write!(f, "1 day left"),
            DeadlineStatus::DaysLeft(days) => write!(f, "{} days left", days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_labels() {
        let today = date(2026, 3, 10);
        assert_eq!(
            DeadlineStatus::for_date(date(2026, 3, 9), today).to_string(),
            "Expired"
        );
        assert_eq!(DeadlineStatus::for_date(today, today).to_string(), "Today");
        assert_eq!(
            DeadlineStatus::for_date(date(2026, 3, 11), today).to_string(),
            "1 day left"
        );
        assert_eq!(
            DeadlineStatus::for_date(date(2026, 4, 9), today).to_string(),
            "30 days left"
        );
    }

    #[test]
    fn test_urgency_window() {
        let today = date(2026, 12, 30);
        assert_eq!(
            DeadlineStatus::for_date(date(2026, 12, 1), today).urgency(),
            Urgency::Overdue
        );
        assert_eq!(DeadlineStatus::for_date(today, today).urgency(), Urgency::Soon);
        assert_eq!(
            DeadlineStatus::for_date(date(2027, 1, 2), today).urgency(),
            Urgency::Soon
        );
        assert_eq!(
            DeadlineStatus::for_date(date(2027, 1, 3), today).urgency(),
            Urgency::Comfortable
        );
    }
}
