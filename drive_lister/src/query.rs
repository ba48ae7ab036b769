//! Builder for Drive `files.list` query predicates.
//!
//! Every caller-supplied value is emitted as a single-quoted string literal
//! with `\` and `'` escaped, so folder names and mime types cannot alter the
//! shape of the predicate.

/// Mime type Drive assigns to folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Alias Drive accepts for the root folder of the authenticated identity.
pub const ROOT_FOLDER_ID: &str = "root";

/// Fields requested when listing a folder.
pub const LIST_FIELDS: &str =
    "nextPageToken, files(id, name, mimeType, size, modifiedTime, createdTime)";

/// Fields requested when looking up a folder by name.
pub const FOLDER_LOOKUP_FIELDS: &str = "files(id, name)";

/// Fields requested when fetching a single file.
pub const GET_FIELDS: &str = "id, name, mimeType, size, modifiedTime, createdTime, parents";

/// A conjunction of Drive query clauses.
#[derive(Debug, Clone, Default)]
pub struct Query {
    clauses: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `'<folder_id>' in parents`
    pub fn in_parents(mut self, folder_id: &str) -> Self {
        self.clauses.push(format!("{} in parents", quote(folder_id)));
        self
    }

    /// `name='<name>'`
    pub fn name_eq(mut self, name: &str) -> Self {
        self.clauses.push(format!("name={}", quote(name)));
        self
    }

    /// `mimeType='<mime_type>'`
    pub fn mime_type_eq(mut self, mime_type: &str) -> Self {
        self.clauses.push(format!("mimeType={}", quote(mime_type)));
        self
    }

    /// `trashed=false`
    pub fn not_trashed(mut self) -> Self {
        self.clauses.push("trashed=false".to_string());
        self
    }

    pub fn build(&self) -> String {
        self.clauses.join(" and ")
    }
}

/// Predicate for the direct, non-trashed children of a folder.
pub fn folder_children(folder_id: &str, mime_type: Option<&str>) -> String {
    let query = Query::new().in_parents(folder_id).not_trashed();
    match mime_type {
        Some(mime_type) => query.mime_type_eq(mime_type).build(),
        None => query.build(),
    }
}

/// Predicate for non-trashed folders with an exact name.
pub fn folder_named(name: &str) -> String {
    Query::new()
        .name_eq(name)
        .mime_type_eq(FOLDER_MIME_TYPE)
        .not_trashed()
        .build()
}

/// Wrap a value in single quotes, escaping backslashes and quotes.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}
