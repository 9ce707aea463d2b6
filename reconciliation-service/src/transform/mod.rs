pub mod mappings;
pub mod reconcile;
pub mod resolve;
pub mod snapshot;
pub mod split;
pub mod window;

pub use mappings::GenerationMaps;
pub use reconcile::{reconcile, retain_valid_mw};
pub use resolve::{resolve_latest, sort_by_mw_loss_desc, ResolveMode};
pub use snapshot::{project_at, project_now, project_today};
pub use split::{split, CategoryTables};
pub use window::filter_overlap;
