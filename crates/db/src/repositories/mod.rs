//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads and
//! standalone writes accept `&PgPool` as the first argument; writes that must
//! join a caller's transaction accept `&mut PgConnection` instead.

pub mod game_repo;
pub mod inventory_repo;
pub mod item_repo;
pub mod listing_repo;
pub mod login_history_repo;
pub mod session_repo;
pub mod user_repo;

pub use game_repo::GameRepo;
pub use inventory_repo::InventoryRepo;
pub use item_repo::ItemRepo;
pub use listing_repo::ListingRepo;
pub use login_history_repo::LoginHistoryRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
