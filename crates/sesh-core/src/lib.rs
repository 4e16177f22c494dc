mod codec;
mod error;
mod repo;
mod requests;
mod session;
mod status;

pub use codec::{decode_repos, encode_repos};
pub use error::{CoreError, ValidationError};
pub use repo::{RepoLocation, SimpleRepo, validate_repos};
pub use requests::{CloneSessionRequest, CreateSessionRequest, UpdateSessionRequest};
pub use session::{
    API_VERSION, KIND, LlmSettings, Session, SessionSpec, UserContext, WorkflowSelection,
    load_session,
};
pub use status::{Condition, ReconciledRepo, ReconciledWorkflow, SessionStatus, upsert_condition};
