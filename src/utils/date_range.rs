use crate::error::CollectError;
use crate::models::{Group, Unit};
use chrono::NaiveDate;

/// Inclusive range of calendar days, `start <= end` guaranteed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CollectError> {
        if start > end {
            return Err(CollectError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days_in_range(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// Every (day, group) pair: days ascending, groups in the order given
    pub fn plan(&self, groups: &[Group]) -> Vec<Unit> {
        self.days()
            .flat_map(|day| {
                groups.iter().map(move |group| Unit {
                    day,
                    group: group.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = DateRange::new(date(2024, 11, 16), date(2024, 11, 15)).unwrap_err();
        assert_eq!(
            err,
            CollectError::InvalidRange {
                start: date(2024, 11, 16),
                end: date(2024, 11, 15)
            }
        );
    }

    #[test]
    fn test_single_day() {
        let range = DateRange::new(date(2024, 11, 15), date(2024, 11, 15)).unwrap();
        assert_eq!(range.days_in_range(), 1);
        assert_eq!(range.days().collect::<Vec<_>>(), vec![date(2024, 11, 15)]);
    }

    #[test]
    fn test_range_crosses_month_and_year() {
        let range = DateRange::new(date(2024, 12, 30), date(2025, 1, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(range.days_in_range(), 4);
        assert_eq!(days.first(), Some(&date(2024, 12, 30)));
        assert_eq!(days.last(), Some(&date(2025, 1, 2)));
    }

    #[test]
    fn test_plan_is_day_major_then_group_order() {
        let range = DateRange::new(date(2024, 11, 15), date(2024, 11, 17)).unwrap();
        let groups = vec![Group::new("SEC", "8"), Group::new("ACC", "2")];
        let plan = range.plan(&groups);

        assert_eq!(plan.len(), 3 * 2);
        let order: Vec<(u32, &str)> = plan
            .iter()
            .map(|u| (chrono::Datelike::day(&u.day), u.group.label.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (15, "SEC"),
                (15, "ACC"),
                (16, "SEC"),
                (16, "ACC"),
                (17, "SEC"),
                (17, "ACC")
            ]
        );
    }

    #[test]
    fn test_plan_without_groups_is_empty() {
        let range = DateRange::new(date(2024, 11, 15), date(2024, 11, 20)).unwrap();
        assert!(range.plan(&[]).is_empty());
    }
}
