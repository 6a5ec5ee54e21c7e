//! Field catalogues for the collections reachable through the query filter builder.
//!
//! Query parameters use the public (camelCase) field names; every name is mapped to a
//! fixed SQL expression here, so no user-supplied text ever reaches the SQL as an
//! identifier.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Text,
    Integer,
    Float,
    Timestamp,
    TextList,
    Json,
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Id => "identifier",
            FieldKind::Text | FieldKind::TextList => "text",
            FieldKind::Integer => "integer",
            FieldKind::Float => "number",
            FieldKind::Timestamp => "date",
            FieldKind::Json => "object",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub column: &'static str,
    pub expr: Option<&'static str>,
    pub kind: FieldKind,
    pub filterable: bool,
    pub sortable: bool,
    /// Left out of the default projection
    pub hidden: bool,
}

impl FieldSpec {
    pub const fn column(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            expr: None,
            kind,
            filterable: true,
            sortable: true,
            hidden: false,
        }
    }

    /// Read-only field assembled from several columns
    pub const fn computed(name: &'static str, expr: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column: "",
            expr: Some(expr),
            kind,
            filterable: false,
            sortable: false,
            hidden: false,
        }
    }

    pub const fn hidden(self) -> Self {
        Self { hidden: true, ..self }
    }

    pub fn sql(&self) -> String {
        match self.expr {
            Some(expr) => expr.to_string(),
            None => format!("\"{}\"", self.column),
        }
    }
}

#[derive(Debug)]
pub struct Collection {
    pub name: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    /// Field matched by the `q` free-text parameter
    pub search_field: &'static str,
    /// Sort applied when the request has no `sort` parameter
    pub default_sort: &'static str,
}

impl Collection {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn id_field(&self) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.kind == FieldKind::Id && f.name == "id")
    }
}

const JOB_LOCATION: &str = "CASE WHEN \"longitude\" IS NULL THEN NULL ELSE json_build_object(\
'type', 'Point', \
'coordinates', json_build_array(\"longitude\", \"latitude\"), \
'formattedAddress', \"formatted_address\", \
'city', \"city\", \
'state', \"state\", \
'zipcode', \"zipcode\", \
'country', \"country\") END";

pub static JOBS: Collection = Collection {
    name: "jobs",
    table: "jobs",
    fields: &[
        FieldSpec::column("id", "id", FieldKind::Id),
        FieldSpec::column("title", "title", FieldKind::Text),
        FieldSpec::column("slug", "slug", FieldKind::Text),
        FieldSpec::column("description", "description", FieldKind::Text),
        FieldSpec::column("email", "email", FieldKind::Text),
        FieldSpec::column("address", "address", FieldKind::Text),
        FieldSpec::computed("location", JOB_LOCATION, FieldKind::Json),
        FieldSpec::column("company", "company", FieldKind::Text),
        FieldSpec::column("industry", "industry", FieldKind::TextList),
        FieldSpec::column("jobType", "job_type", FieldKind::Text),
        FieldSpec::column("minEducation", "min_education", FieldKind::Text),
        FieldSpec::column("positions", "positions", FieldKind::Integer),
        FieldSpec::column("experience", "experience", FieldKind::Text),
        FieldSpec::column("salary", "salary", FieldKind::Integer),
        FieldSpec::column("postingDate", "posting_date", FieldKind::Timestamp),
        FieldSpec::column("lastDate", "last_date", FieldKind::Timestamp),
        FieldSpec::column("user", "user_id", FieldKind::Id),
        FieldSpec::column("version", "version", FieldKind::Integer).hidden(),
    ],
    search_field: "title",
    default_sort: "-postingDate",
};

pub static USERS: Collection = Collection {
    name: "users",
    table: "users",
    fields: &[
        FieldSpec::column("id", "id", FieldKind::Id),
        FieldSpec::column("name", "name", FieldKind::Text),
        FieldSpec::column("email", "email", FieldKind::Text),
        FieldSpec::column("role", "role", FieldKind::Text),
        FieldSpec::column("createdAt", "created_at", FieldKind::Timestamp),
        FieldSpec::column("updatedAt", "updated_at", FieldKind::Timestamp),
        FieldSpec::column("version", "version", FieldKind::Integer).hidden(),
    ],
    search_field: "name",
    default_sort: "-createdAt",
};
