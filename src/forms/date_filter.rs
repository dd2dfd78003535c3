use chrono::{DateTime, Days, NaiveDate, Utc};

/// Accepted date layouts: (format, separator, position of the year field, year digits).
///
/// chrono's `%Y` also takes short years, so the year width is checked first.
const DATE_INPUT_FORMATS: &[(&str, char, usize, usize)] = &[
    ("%Y-%m-%d", '-', 0, 4),
    ("%m/%d/%Y", '/', 2, 4),
    ("%m/%d/%y", '/', 2, 2),
];

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Bound state of the `date_from` / `date_to` query parameters.
///
/// Raw values are kept so the HTML view can echo them back next to the errors.
#[derive(Debug, Clone, Default)]
pub struct DateRangeForm {
    pub raw_from: String,
    pub raw_to: String,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    errors: Vec<FieldError>,
}

impl DateRangeForm {
    pub fn bind(date_from: Option<&str>, date_to: Option<&str>) -> Self {
        let mut form = DateRangeForm {
            raw_from: date_from.unwrap_or_default().to_string(),
            raw_to: date_to.unwrap_or_default().to_string(),
            ..Default::default()
        };

        form.from = form.clean("date_from", date_from);
        form.to = form.clean("date_to", date_to);
        form
    }

    fn clean(&mut self, field: &'static str, raw: Option<&str>) -> Option<NaiveDate> {
        let value = raw.map(str::trim).filter(|v| !v.is_empty())?;
        match parse_date(value) {
            Some(date) => Some(date),
            None => {
                self.errors.push(FieldError {
                    field,
                    message: "Enter a valid date.".to_string(),
                });
                None
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Filter to apply to `submit_time`. An invalid form filters nothing.
    pub fn filter(&self) -> SubmitTimeFilter {
        if !self.is_valid() {
            return SubmitTimeFilter::Unbounded;
        }

        let from = self.from.map(start_of_day);
        // submit_time carries a time of day, so the end date is pushed to the next midnight
        let until = self
            .to
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .map(start_of_day);

        match (from, until) {
            (Some(from), Some(until)) => SubmitTimeFilter::Between { from, until },
            (Some(from), None) => SubmitTimeFilter::From(from),
            (None, Some(until)) => SubmitTimeFilter::UpTo(until),
            (None, None) => SubmitTimeFilter::Unbounded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitTimeFilter {
    Unbounded,
    /// `submit_time >= from`
    From(DateTime<Utc>),
    /// `submit_time <= until`
    UpTo(DateTime<Utc>),
    /// `from <= submit_time < until`
    Between {
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    },
}

impl SubmitTimeFilter {
    pub fn contains(&self, submit_time: DateTime<Utc>) -> bool {
        match *self {
            SubmitTimeFilter::Unbounded => true,
            SubmitTimeFilter::From(from) => submit_time >= from,
            SubmitTimeFilter::UpTo(until) => submit_time <= until,
            SubmitTimeFilter::Between { from, until } => submit_time >= from && submit_time < until,
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .filter(|(_, sep, year_pos, digits)| {
            value
                .split(*sep)
                .nth(*year_pos)
                .is_some_and(|year| year.len() == *digits && year.bytes().all(|b| b.is_ascii_digit()))
        })
        .find_map(|(fmt, ..)| NaiveDate::parse_from_str(value, fmt).ok())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}
