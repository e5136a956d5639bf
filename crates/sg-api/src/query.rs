//! Find query builder and paging results.

use serde::Deserialize;
use shotgun_json_client::{Direction, FieldValue, Filter, FilterOperator, Order, ReadParams};

use crate::record::EntityRecord;

/// A `find` against one entity type.
///
/// A query issues exactly one `read` call. `limit` caps the page size (zero
/// means the configured default) and `page` selects which page; callers walk
/// pages themselves.
///
/// # Example
///
/// ```rust,ignore
/// let query = FindQuery::new("Shot")
///     .filter("project", "is", EntityRef::new("Project", 4))
///     .filter("sg_status_list", "is_not", "omt")
///     .fields(["code", "sg_status_list"])
///     .order_by("code", Direction::Asc)
///     .limit(50);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    entity_type: String,
    filters: Vec<Filter>,
    filter_operator: FilterOperator,
    fields: Vec<String>,
    order: Vec<Order>,
    limit: u32,
    page: u32,
    retired_only: bool,
}

impl FindQuery {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            filters: Vec::new(),
            filter_operator: FilterOperator::All,
            fields: Vec::new(),
            order: Vec::new(),
            limit: 0,
            page: 0,
            retired_only: false,
        }
    }

    /// Add a single-operand condition.
    pub fn filter(
        mut self,
        path: impl Into<String>,
        relation: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.filters.push(Filter::new(path, relation, value));
        self
    }

    /// Add a prebuilt condition, e.g. a `between` with two operands.
    pub fn condition(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Combine conditions with `all` (the default) or `any`.
    pub fn filter_operator(mut self, operator: FilterOperator) -> Self {
        self.filter_operator = operator;
        self
    }

    /// Fields to return. `id` is returned when none are named.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn order_by(mut self, field_name: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Order::new(field_name, direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// One-based page number. Zero is treated as the first page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Return retired entities instead of active ones.
    pub fn retired_only(mut self, retired_only: bool) -> Self {
        self.retired_only = retired_only;
        self
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    pub fn get_limit(&self) -> u32 {
        self.limit
    }

    pub fn get_page(&self) -> u32 {
        self.page
    }

    /// Wire params for this query.
    pub(crate) fn to_read_params(&self, records_per_page: u32, has_paging: bool) -> ReadParams {
        ReadParams {
            entity_type: self.entity_type.clone(),
            filters: self.filters.clone(),
            filter_operator: self.filter_operator,
            return_fields: self.fields.clone(),
            order: self.order.clone(),
            entities_per_page: if self.limit > 0 {
                self.limit
            } else {
                records_per_page
            },
            current_page: self.page.max(1),
            retired_only: self.retired_only,
            return_paging_info: has_paging,
        }
    }
}

/// Paging summary the server returns alongside a page of entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub struct PagingInfo {
    #[serde(default)]
    pub entity_count: u64,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub entities_per_page: u32,
    #[serde(default)]
    pub page_count: u32,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct FindPage {
    pub entities: Vec<EntityRecord>,
    pub paging_info: Option<PagingInfo>,
}

impl FindPage {
    /// More pages follow this one, according to the server's paging info.
    pub fn has_more(&self) -> bool {
        self.paging_info
            .is_some_and(|info| info.current_page < info.page_count)
    }
}
