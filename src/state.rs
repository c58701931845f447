use std::sync::Arc;
use crate::domain::ports::{
    TenantRepository, UserRepository, InviteCodeRepository,
    OpportunityRepository, GoalRepository, CommentRepository,
};
use crate::domain::services::{
    auth_service::AuthService,
    invite_registry::InviteCodeRegistry,
    action_dispatcher::OpportunityActionDispatcher,
};
use crate::config::Config;
use crate::error::AppError;

/// The record store, one adapter per port.
#[derive(Clone)]
pub struct Repositories {
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub invite_repo: Arc<dyn InviteCodeRepository>,
    pub opportunity_repo: Arc<dyn OpportunityRepository>,
    pub goal_repo: Arc<dyn GoalRepository>,
    pub comment_repo: Arc<dyn CommentRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub goal_repo: Arc<dyn GoalRepository>,
    pub auth_service: Arc<AuthService>,
    pub invite_registry: Arc<InviteCodeRegistry>,
    pub dispatcher: Arc<OpportunityActionDispatcher>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Result<Self, AppError> {
        let auth_service = Arc::new(AuthService::new(&config)?);
        let invite_registry = Arc::new(InviteCodeRegistry::new(repos.invite_repo.clone()));
        let dispatcher = Arc::new(OpportunityActionDispatcher::new(
            repos.opportunity_repo.clone(),
            repos.goal_repo.clone(),
            repos.user_repo.clone(),
            repos.comment_repo.clone(),
        ));

        Ok(Self {
            config,
            tenant_repo: repos.tenant_repo,
            user_repo: repos.user_repo,
            goal_repo: repos.goal_repo,
            auth_service,
            invite_registry,
            dispatcher,
        })
    }
}
