mod store;
pub use store::{CommentStore, StoreConfig};

mod screen;
pub use screen::{CommentsScreen, Outcome, ScreenLifetime, Status};

pub mod parse;
pub mod splice;
pub mod view;

pub mod api {
    pub use fce_api::*;
}

pub mod prelude {
    pub use crate::api::{Action, Identity, Mode};
    pub use crate::view::{PendingOp, RowPlan, RowSelection};
}
