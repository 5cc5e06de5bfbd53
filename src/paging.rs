// Page requests and result pages
//
// Query-string conventions: `page` is 0-based, `size` is bounded, and `sort`
// may repeat, each value being `field[,field...][,asc|desc]`.

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One sort criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

/// Size limits applied while reading a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        PageLimits {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<Order>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        PageRequest {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_order(mut self, field: &str, direction: Direction) -> Self {
        self.sort.push(Order {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Build a request from raw query pairs.
    ///
    /// Unparseable numbers fall back to defaults, a negative page becomes 0,
    /// a size below 1 becomes the default and a size above the limit is
    /// clamped to it.
    pub fn from_query(pairs: &[(String, String)], limits: PageLimits) -> Self {
        let mut page = 0;
        let mut size = limits.default_size;
        let mut sort = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    if let Ok(n) = value.trim().parse::<i64>() {
                        page = n.clamp(0, i64::from(u32::MAX)) as u32;
                    }
                }
                "size" => {
                    if let Ok(n) = value.trim().parse::<i64>() {
                        size = if n < 1 {
                            limits.default_size
                        } else {
                            n.min(i64::from(limits.max_size)) as u32
                        };
                    }
                }
                "sort" => sort.extend(parse_sort(value)),
                _ => {}
            }
        }

        PageRequest {
            page,
            size: size.max(1),
            sort,
        }
    }
}

/// Parse one `sort` value: `name`, `name,desc`, `name,code,asc`
fn parse_sort(raw: &str) -> Vec<Order> {
    let mut parts: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let direction = match parts.last().and_then(|last| Direction::parse(last)) {
        Some(direction) => {
            parts.pop();
            direction
        }
        None => Direction::Asc,
    };

    parts
        .into_iter()
        .map(|field| Order {
            field: field.to_string(),
            direction,
        })
        .collect()
}

/// A window of records plus pagination metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Page {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.size.max(1)))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }
}
