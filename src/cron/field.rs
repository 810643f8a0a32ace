//! # Single cron field: parsing and bitset lookups.
//!
//! Each of the five fields compiles into a [`CronField`], a `u64` bitset over the
//! field's value range plus a flag recording whether the field text began with `*`.
//! The flag drives the day-of-month / day-of-week combination rule in
//! [`CronExpression`](super::CronExpression).
//!
//! ## Syntax (per comma-separated item)
//! ```text
//! *          every value in range
//! 5          single value
//! 1-5        inclusive range
//! */15       every 15th value from the range start
//! 10-40/10   every 10th value inside the range
//! 5/20       every 20th value from 5 to the range end
//! MON, JAN   names (case-insensitive) where the field defines them
//! ```

/// Static description of one cron field.
#[derive(Debug)]
pub(crate) struct FieldKind {
    pub(crate) name: &'static str,
    pub(crate) min: u32,
    pub(crate) max: u32,
    /// Symbolic names; `names[i]` stands for the value `min + i`.
    pub(crate) names: &'static [&'static str],
}

pub(crate) const MINUTE: FieldKind = FieldKind {
    name: "minute",
    min: 0,
    max: 59,
    names: &[],
};

pub(crate) const HOUR: FieldKind = FieldKind {
    name: "hour",
    min: 0,
    max: 23,
    names: &[],
};

pub(crate) const DAY_OF_MONTH: FieldKind = FieldKind {
    name: "day-of-month",
    min: 1,
    max: 31,
    names: &[],
};

pub(crate) const MONTH: FieldKind = FieldKind {
    name: "month",
    min: 1,
    max: 12,
    names: &[
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ],
};

/// `7` is accepted as an alias for Sunday and folded onto `0` after parsing.
pub(crate) const DAY_OF_WEEK: FieldKind = FieldKind {
    name: "day-of-week",
    min: 0,
    max: 7,
    names: &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"],
};

/// Compiled cron field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CronField {
    bits: u64,
    unrestricted: bool,
}

impl CronField {
    /// Parses the text of one field.
    ///
    /// Returns a human-readable reason on failure; the caller wraps it into
    /// [`SchedulerError::InvalidCron`](crate::SchedulerError::InvalidCron).
    pub(crate) fn parse(text: &str, kind: &FieldKind) -> Result<Self, String> {
        if text.is_empty() {
            return Err(format!("{} field is empty", kind.name));
        }

        let mut bits = 0u64;
        for item in text.split(',') {
            bits |= parse_item(item, kind)?;
        }

        if kind.max == 7 && bits & (1 << 7) != 0 {
            bits = (bits & !(1 << 7)) | 1;
        }

        Ok(Self {
            bits,
            unrestricted: text.starts_with('*'),
        })
    }

    /// True when the field text started with `*` (`*`, `*/n`).
    #[inline]
    pub(crate) fn is_unrestricted(&self) -> bool {
        self.unrestricted
    }

    #[inline]
    pub(crate) fn contains(&self, value: u32) -> bool {
        value < 64 && self.bits & (1 << value) != 0
    }

    /// Smallest set value `>= from`.
    pub(crate) fn next_set(&self, from: u32) -> Option<u32> {
        if from >= 64 {
            return None;
        }
        let masked = self.bits & (u64::MAX << from);
        (masked != 0).then(|| masked.trailing_zeros())
    }

    /// Largest set value `<= upto`.
    pub(crate) fn prev_set(&self, upto: u32) -> Option<u32> {
        let mask = if upto >= 63 {
            u64::MAX
        } else {
            (1u64 << (upto + 1)) - 1
        };
        let masked = self.bits & mask;
        (masked != 0).then(|| 63 - masked.leading_zeros())
    }

    #[inline]
    pub(crate) fn first(&self) -> Option<u32> {
        self.next_set(0)
    }

    #[inline]
    pub(crate) fn last(&self) -> Option<u32> {
        self.prev_set(63)
    }

    /// Iterates the set values in ascending order.
    pub(crate) fn values(&self) -> impl Iterator<Item = u32> + '_ {
        (0..64).filter(|v| self.contains(*v))
    }
}

fn parse_item(item: &str, kind: &FieldKind) -> Result<u64, String> {
    if item.is_empty() {
        return Err(format!("{} field has an empty list item", kind.name));
    }

    let (range, step) = match item.split_once('/') {
        Some((range, step)) => (range, Some(parse_step(step, kind)?)),
        None => (item, None),
    };

    let (lo, hi) = if range == "*" {
        (kind.min, kind.max)
    } else if let Some((a, b)) = range.split_once('-') {
        (parse_value(a, kind)?, parse_value(b, kind)?)
    } else {
        let v = parse_value(range, kind)?;
        match step {
            Some(_) => (v, kind.max),
            None => (v, v),
        }
    };

    if lo > hi {
        return Err(format!(
            "{} range {lo}-{hi} starts after it ends",
            kind.name
        ));
    }

    let step = step.unwrap_or(1);
    let mut bits = 0u64;
    let mut v = lo;
    while v <= hi {
        bits |= 1 << v;
        v += step;
    }
    Ok(bits)
}

fn parse_step(text: &str, kind: &FieldKind) -> Result<u32, String> {
    match text.parse::<u32>() {
        Ok(0) => Err(format!("{} step must be greater than zero", kind.name)),
        Ok(step) => Ok(step),
        Err(_) => Err(format!("{} step {text:?} is not a number", kind.name)),
    }
}

fn parse_value(text: &str, kind: &FieldKind) -> Result<u32, String> {
    let value = match text.parse::<u32>() {
        Ok(v) => v,
        Err(_) => kind
            .names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(text))
            .map(|idx| kind.min + idx as u32)
            .ok_or_else(|| format!("{} value {text:?} is not recognised", kind.name))?,
    };

    if value < kind.min || value > kind.max {
        return Err(format!(
            "{} value {value} is out of range {}-{}",
            kind.name, kind.min, kind.max
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(text: &str, kind: &FieldKind) -> Vec<u32> {
        CronField::parse(text, kind).unwrap().values().collect()
    }

    #[test]
    fn star_covers_whole_range() {
        assert_eq!(values("*", &HOUR), (0..24).collect::<Vec<_>>());
        assert!(CronField::parse("*", &HOUR).unwrap().is_unrestricted());
        assert!(CronField::parse("*/5", &HOUR).unwrap().is_unrestricted());
        assert!(!CronField::parse("0-23", &HOUR).unwrap().is_unrestricted());
    }

    #[test]
    fn lists_ranges_and_steps() {
        assert_eq!(values("1,5,9", &MINUTE), vec![1, 5, 9]);
        assert_eq!(values("10-13", &MINUTE), vec![10, 11, 12, 13]);
        assert_eq!(values("*/20", &MINUTE), vec![0, 20, 40]);
        assert_eq!(values("10-40/15", &MINUTE), vec![10, 25, 40]);
        assert_eq!(values("50/5", &MINUTE), vec![50, 55]);
        assert_eq!(values("*/10", &DAY_OF_MONTH), vec![1, 11, 21, 31]);
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(values("jan-Mar", &MONTH), vec![1, 2, 3]);
        assert_eq!(values("MON-FRI", &DAY_OF_WEEK), vec![1, 2, 3, 4, 5]);
        assert_eq!(values("sun,sat", &DAY_OF_WEEK), vec![0, 6]);
    }

    #[test]
    fn sunday_alias_folds_onto_zero() {
        assert_eq!(values("7", &DAY_OF_WEEK), vec![0]);
        assert_eq!(values("5-7", &DAY_OF_WEEK), vec![0, 5, 6]);
        assert_eq!(values("*", &DAY_OF_WEEK), (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_malformed_items() {
        assert!(CronField::parse("", &MINUTE).is_err());
        assert!(CronField::parse("60", &MINUTE).is_err());
        assert!(CronField::parse("0", &DAY_OF_MONTH).is_err());
        assert!(CronField::parse("5-1", &HOUR).is_err());
        assert!(CronField::parse("*/0", &HOUR).is_err());
        assert!(CronField::parse("*/x", &HOUR).is_err());
        assert!(CronField::parse("1,,2", &HOUR).is_err());
        assert!(CronField::parse("MON", &MONTH).is_err());
        assert!(CronField::parse("JAN", &HOUR).is_err());
    }

    #[test]
    fn neighbour_lookups() {
        let f = CronField::parse("5,20,40", &MINUTE).unwrap();
        assert_eq!(f.next_set(0), Some(5));
        assert_eq!(f.next_set(5), Some(5));
        assert_eq!(f.next_set(21), Some(40));
        assert_eq!(f.next_set(41), None);
        assert_eq!(f.prev_set(59), Some(40));
        assert_eq!(f.prev_set(19), Some(5));
        assert_eq!(f.prev_set(4), None);
        assert_eq!(f.first(), Some(5));
        assert_eq!(f.last(), Some(40));
    }
}
