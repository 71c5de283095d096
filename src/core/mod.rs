pub mod allocation;
pub mod dice;
pub mod draw;
pub mod order;
pub mod pools;
pub mod rendezvous;
pub mod session;

pub use crate::domain::model::{Pool, Response, Round, SubjectId, Team, TeamId};
pub use crate::domain::ports::{ConfigProvider, DrawHooks};
pub use crate::utils::error::Result;
