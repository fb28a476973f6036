//! Blog sidebar: tag ranks and the dated archive.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::model::Record;

/// CSS class per rank bucket, lowest tier first.
pub const RANKS: [&str; 10] = [
    "tagRank10",
    "tagRank9",
    "tagRank8",
    "tagRank7",
    "tagRank6",
    "tagRank5",
    "tagRank4",
    "tagRank3",
    "tagRank2",
    "tagRank1",
];

/// Nominative month names, January first.
pub const MONTHS: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Month number standing for a whole year in [`ArchiveYear::buckets`].
pub const WHOLE_YEAR: u32 = 13;

/// Something carrying tags.
pub trait Tagged {
    fn tags(&self) -> Vec<&str>;
}

/// Something with a creation time.
pub trait Dated {
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl Tagged for Record {
    fn tags(&self) -> Vec<&str> {
        self.get("tags")
            .and_then(|v| v.as_list())
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Dated for Record {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRank {
    pub title: String,
    /// 0 is the rarest tier, 9 the most frequent.
    pub bucket: usize,
    pub level: &'static str,
}

/// Rank every distinct tag by its share of all tag occurrences.
///
/// Sorted by tag title. An empty corpus yields an empty list.
pub fn tag_ranks<T: Tagged>(items: &[T]) -> Vec<TagRank> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        for tag in item.tags() {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    counts
        .into_iter()
        .map(|(title, count)| {
            let bucket = (count * 10 / total).min(RANKS.len() - 1);
            TagRank {
                title: title.to_string(),
                bucket,
                level: RANKS[bucket],
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveMonth {
    pub month: u32,
    pub posts: usize,
    pub name: &'static str,
}

impl ArchiveMonth {
    fn new(month: u32) -> Self {
        Self {
            month,
            posts: 0,
            name: month_name(month).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveYear {
    pub year: i32,
    pub posts: usize,
    pub months: Vec<ArchiveMonth>,
}

impl ArchiveYear {
    /// `(month, count)` pairs in encounter order, optionally led by
    /// `(13, posts)` for the whole year.
    pub fn buckets(&self, with_year_total: bool) -> Vec<(u32, usize)> {
        let total = with_year_total.then_some((WHOLE_YEAR, self.posts));
        total
            .into_iter()
            .chain(self.months.iter().map(|m| (m.month, m.posts)))
            .collect()
    }
}

pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTHS.get(index).copied()
}

/// Group time-ordered items into years and months.
///
/// Grouping only merges adjacent items: the input must already be sorted
/// by creation time. Undated items are skipped.
pub fn archive_years<T: Dated>(items: &[T]) -> Vec<ArchiveYear> {
    let mut years: Vec<ArchiveYear> = Vec::new();

    for created in items.iter().filter_map(Dated::created_at) {
        let (year, month) = (created.year(), created.month());

        if years.last().is_none_or(|y| y.year != year) {
            years.push(ArchiveYear {
                year,
                posts: 0,
                months: Vec::new(),
            });
        }
        let Some(current) = years.last_mut() else {
            continue;
        };
        current.posts += 1;

        if current.months.last().is_none_or(|m| m.month != month) {
            current.months.push(ArchiveMonth::new(month));
        }
        if let Some(bucket) = current.months.last_mut() {
            bucket.posts += 1;
        }
    }

    years
}

/// Sidebar data for the blog index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Archive {
    pub tags: Vec<TagRank>,
    pub years: Vec<ArchiveYear>,
}

impl Archive {
    /// Build from posts sorted newest first.
    pub fn build<T: Tagged + Dated>(items: &[T]) -> Self {
        Self {
            tags: tag_ranks(items),
            years: archive_years(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;
    use chrono::TimeZone;
    use rstest::rstest;

    fn post(year: i32, month: u32, tags: &[&str]) -> Record {
        Record::new(Kind::Post)
            .with_created(Utc.with_ymd_and_hms(year, month, 10, 12, 0, 0).unwrap())
            .with("tags", tags.to_vec())
    }

    #[test]
    fn ranks_by_share_of_occurrences() {
        let posts = vec![
            post(2020, 1, &["b", "a"]),
            post(2020, 1, &["a"]),
            post(2020, 1, &["a"]),
        ];
        let ranks = tag_ranks(&posts);

        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[0].title, "a");
        assert_eq!(ranks[0].bucket, 7);
        assert_eq!(ranks[0].level, "tagRank3");
        assert_eq!(ranks[1].title, "b");
        assert_eq!(ranks[1].bucket, 2);
    }

    #[test]
    fn single_tag_is_clamped() {
        let ranks = tag_ranks(&[post(2020, 1, &["only"])]);
        assert_eq!(ranks[0].bucket, 9);
        assert_eq!(ranks[0].level, "tagRank1");
    }

    #[test]
    fn untagged_corpus_has_no_ranks() {
        assert!(tag_ranks(&[post(2020, 1, &[])]).is_empty());
        assert!(tag_ranks::<Record>(&[]).is_empty());
    }

    #[test]
    fn groups_adjacent_months() {
        let posts = vec![
            post(2020, 1, &[]),
            post(2020, 1, &[]),
            post(2020, 2, &[]),
            post(2019, 12, &[]),
        ];
        let years = archive_years(&posts);

        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, 2020);
        assert_eq!(years[0].buckets(false), vec![(1, 2), (2, 1)]);
        assert_eq!(years[1].year, 2019);
        assert_eq!(years[1].buckets(false), vec![(12, 1)]);
        assert_eq!(years[1].months[0].name, "Декабрь");
    }

    #[test]
    fn year_total_leads_buckets() {
        let years = archive_years(&[post(2021, 3, &[]), post(2021, 1, &[])]);
        assert_eq!(years[0].buckets(true), vec![(13, 2), (3, 1), (1, 1)]);
    }

    #[test]
    fn unordered_input_is_not_regrouped() {
        let years = archive_years(&[post(2020, 1, &[]), post(2019, 1, &[]), post(2020, 1, &[])]);
        assert_eq!(years.len(), 3);
    }

    #[rstest]
    #[case(1, Some("Январь"))]
    #[case(12, Some("Декабрь"))]
    #[case(0, None)]
    #[case(13, None)]
    fn month_names(#[case] month: u32, #[case] expected: Option<&str>) {
        assert_eq!(month_name(month), expected);
    }

    #[test]
    fn archive_collects_both() {
        let archive = Archive::build(&[post(2020, 5, &["rust"])]);
        assert_eq!(archive.tags.len(), 1);
        assert_eq!(archive.years[0].months[0].name, "Май");
    }
}
