use super::catalog::{Collection, FieldSpec};
use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, FilterWhereInfo, SqlResult};

/// Which fields each returned document carries
#[derive(Debug, Clone, Default)]
pub enum Projection {
    /// Every field except the hidden ones
    #[default]
    Default,
    /// Exactly these fields, plus the identity field
    Include(Vec<&'static FieldSpec>),
    /// Every field except these
    Exclude(Vec<&'static FieldSpec>),
}

impl Projection {
    /// Parses `title,salary` (inclusion) or `-description,-email` (exclusion).
    pub fn parse(collection: &Collection, spec: &str) -> Result<Self, FilterError> {
        let mut include = vec![];
        let mut exclude = vec![];

        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, excluded) = match part.strip_prefix('-') {
                Some(name) => (name, true),
                None => (part, false),
            };
            let field = collection
                .field(name)
                .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
            if excluded {
                exclude.push(field);
            } else {
                include.push(field);
            }
        }

        match (include.is_empty(), exclude.is_empty()) {
            (false, false) => Err(FilterError::MixedProjection),
            (true, true) => Ok(Projection::Default),
            (false, true) => Ok(Projection::Include(include)),
            (true, false) => Ok(Projection::Exclude(exclude)),
        }
    }

    fn selects(&self, field: &FieldSpec) -> bool {
        match self {
            Projection::Default => !field.hidden,
            Projection::Include(fields) => field.name == "id" || fields.iter().any(|f| f.name == field.name),
            Projection::Exclude(fields) => !fields.iter().any(|f| f.name == field.name),
        }
    }
}

/// Deferred read against one collection. Each stage consumes and returns the handle;
/// nothing touches the database until the query is handed to an executor.
#[derive(Debug, Clone)]
pub struct Filter {
    collection: &'static Collection,
    where_data: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    projection: Projection,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(collection: &'static Collection) -> Self {
        Self {
            collection,
            where_data: vec![],
            order_data: vec![],
            projection: Projection::Default,
            limit: None,
            offset: None,
        }
    }

    pub fn collection(&self) -> &'static Collection {
        self.collection
    }

    /// Adds predicates; repeated calls narrow the result further.
    pub fn find(mut self, conditions: Vec<FilterWhereInfo>) -> Self {
        self.where_data.extend(conditions);
        self
    }

    /// Adds sort keys after any already present.
    pub fn sort(mut self, order: Vec<FilterOrderInfo>) -> Self {
        self.order_data.extend(order);
        self
    }

    pub fn select(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn skip(mut self, offset: i64) -> Self {
        self.offset = Some(offset.max(0));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        let limit = limit.max(0);

        // Apply max limit from config
        let max_limit = crate::config::CONFIG.filter.max_limit.unwrap_or(i64::MAX);
        let applied_limit = if limit > max_limit {
            if crate::config::CONFIG.filter.debug_logging {
                tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max_limit);
            }
            max_limit
        } else {
            limit
        };

        self.limit = Some(applied_limit);
        self
    }

    pub fn applied_limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn applied_offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, 0)?;

        let query = [
            format!("SELECT {} AS doc", self.build_select_clause()),
            format!("FROM \"{}\"", self.collection.table),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            self.build_order_clause(),
            self.build_limit_clause(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.where_data, 0)?;
        let query = if where_clause.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.collection.table)
        } else {
            format!("SELECT COUNT(*) AS count FROM \"{}\" WHERE {}", self.collection.table, where_clause)
        };
        Ok(SqlResult { query, params })
    }

    fn build_select_clause(&self) -> String {
        let pairs: Vec<String> = self
            .collection
            .fields
            .iter()
            .filter(|f| self.projection.selects(f))
            .map(|f| format!("'{}', {}", f.name, f.sql()))
            .collect();
        format!("json_build_object({})", pairs.join(", "))
    }

    // Ties are broken by id so that pages never overlap.
    fn build_order_clause(&self) -> String {
        let mut order = self.order_data.clone();
        if let Some(id) = self.collection.id_field() {
            if !order.iter().any(|o| o.field.name == id.name) {
                order.push(FilterOrderInfo { field: id, sort: super::types::SortDirection::Asc });
            }
        }
        FilterOrder::generate(&order)
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, Some(o)) => format!("OFFSET {}", o),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::catalog::{JOBS, USERS};

    #[test]
    fn bare_query_selects_visible_fields_ordered_by_id() {
        let sql = Filter::new(&USERS).to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT json_build_object('id', \"id\", 'name', \"name\", 'email', \"email\", 'role', \"role\", \
'createdAt', \"created_at\", 'updatedAt', \"updated_at\") AS doc FROM \"users\" ORDER BY \"id\" ASC"
        );
        assert!(sql.params.is_empty());
    }

    #[test]
    fn inclusion_always_keeps_id() {
        let projection = Projection::parse(&JOBS, "title,salary").unwrap();
        let sql = Filter::new(&JOBS).select(projection).to_sql().unwrap();
        assert!(sql
            .query
            .starts_with("SELECT json_build_object('id', \"id\", 'title', \"title\", 'salary', \"salary\") AS doc"));
    }

    #[test]
    fn exclusion_keeps_everything_else() {
        let projection = Projection::parse(&JOBS, "-description").unwrap();
        let sql = Filter::new(&JOBS).select(projection).to_sql().unwrap();
        assert!(!sql.query.contains("'description'"));
        assert!(sql.query.contains("'version', \"version\""));
    }

    #[test]
    fn mixed_projection_is_rejected() {
        assert!(matches!(
            Projection::parse(&JOBS, "title,-salary"),
            Err(FilterError::MixedProjection)
        ));
        assert!(matches!(
            Projection::parse(&JOBS, "passwordHash"),
            Err(FilterError::UnknownField(_))
        ));
    }

    #[test]
    fn explicit_id_sort_is_not_repeated() {
        let order = FilterOrder::validate_and_parse(&USERS, "-id").unwrap();
        let sql = Filter::new(&USERS).sort(order).to_sql().unwrap();
        assert!(sql.query.ends_with("ORDER BY \"id\" DESC"));
    }

    #[test]
    fn limit_and_offset_render_last() {
        let sql = Filter::new(&USERS).skip(20).limit(10).to_sql().unwrap();
        assert!(sql.query.ends_with("ORDER BY \"id\" ASC LIMIT 10 OFFSET 20"));
    }

    #[test]
    fn limit_is_capped_by_config() {
        let cap = crate::config::CONFIG.filter.max_limit.unwrap_or(i64::MAX);
        let filter = Filter::new(&JOBS).limit(i64::MAX);
        assert_eq!(filter.applied_limit(), Some(cap));
    }

    #[test]
    fn count_ignores_projection_order_and_paging() {
        let order = FilterOrder::validate_and_parse(&USERS, "name").unwrap();
        let sql = Filter::new(&USERS).sort(order).limit(5).to_count_sql().unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) AS count FROM \"users\"");
    }
}
