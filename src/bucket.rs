use crate::{CalendarMonth, PERIOD_COUNT, Period, PeriodRange};

/// Records of one month grouped by reporting period.
///
/// Built by [`CalendarMonth::bucket`]. Within each period, records keep the
/// order they were given in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBuckets<T> {
    month:   CalendarMonth,
    buckets: [Vec<T>; PERIOD_COUNT],
    skipped: usize,
}

impl<T> MonthBuckets<T> {
    pub(crate) fn new(month: CalendarMonth) -> Self {
        Self {
            month,
            buckets: std::array::from_fn(|_| Vec::new()),
            skipped: 0,
        }
    }

    pub(crate) fn push(&mut self, period: Period, item: T) {
        self.buckets[period.index()].push(item);
    }

    pub(crate) const fn skip(&mut self) {
        self.skipped += 1;
    }

    pub const fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn get(&self, period: Period) -> &[T] {
        &self.buckets[period.index()]
    }

    /// Ranges paired with their records, in order `P1`..`P4`
    pub fn iter(&self) -> impl Iterator<Item = (PeriodRange, &[T])> {
        self.month
            .period_ranges()
            .into_iter()
            .zip(self.buckets.iter().map(Vec::as_slice))
    }

    pub fn counts(&self) -> [usize; PERIOD_COUNT] {
        Period::ALL.map(|period| self.get(period).len())
    }

    /// Records dropped because they were dated outside the month
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Total records kept across all periods
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn into_inner(self) -> [Vec<T>; PERIOD_COUNT] {
        self.buckets
    }
}
