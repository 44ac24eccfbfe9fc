//! Data transfer objects for the session export format.

mod session;

pub use session::{
    export_session_json, parse_session_json, ClusterRecord, NodeRecord, PromptLogRecord,
    SessionExport, IMPORTED_SESSION_TITLE,
};
