pub mod sqlite_tenant_repo;
pub mod sqlite_user_repo;
pub mod sqlite_invite_code_repo;
pub mod sqlite_opportunity_repo;
pub mod sqlite_goal_repo;
pub mod sqlite_comment_repo;

pub mod postgres_tenant_repo;
pub mod postgres_user_repo;
pub mod postgres_invite_code_repo;
pub mod postgres_opportunity_repo;
pub mod postgres_goal_repo;
pub mod postgres_comment_repo;
