/// Splits a counted result set into fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

/// One resolved page: what to fetch and how to link around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub offset: i64,
    pub limit: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// An empty result set still has one (empty) page.
    pub fn num_pages(&self) -> i64 {
        ((self.count + self.per_page - 1) / self.per_page).max(1)
    }

    /// Resolve the raw `p` parameter.
    ///
    /// Missing or non-integer input selects page 1; any integer outside
    /// `1..=num_pages` selects the last page.
    pub fn page(&self, raw: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages();
        let number = match raw.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if (1..=num_pages).contains(&n) => n,
            Some(Ok(_)) => num_pages,
        };

        PageWindow {
            number,
            num_pages,
            count: self.count,
            offset: (number - 1) * self.per_page,
            limit: self.per_page,
        }
    }
}

impl PageWindow {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// 1-based index of the first row on this page, 0 when empty.
    pub fn start_index(&self) -> i64 {
        if self.count == 0 { 0 } else { self.offset + 1 }
    }

    pub fn end_index(&self) -> i64 {
        (self.offset + self.limit).min(self.count)
    }
}
