pub mod announcement_service;

use std::sync::Arc;

use crate::auth::{AuthService, CsrfService};
use crate::repository::AnnouncementRepository;
use announcement_service::AnnouncementService;

pub struct ServiceContext {
    pub announcement_repo: Arc<dyn AnnouncementRepository>,
    pub announcement_service: Arc<AnnouncementService>,
    pub auth_service: Arc<AuthService>,
    pub csrf_service: Arc<CsrfService>,
}

impl ServiceContext {
    pub fn new(
        announcement_repo: Arc<dyn AnnouncementRepository>,
        auth_service: Arc<AuthService>,
        csrf_service: Arc<CsrfService>,
    ) -> Self {
        let announcement_service = Arc::new(AnnouncementService::new(announcement_repo.clone()));

        Self {
            announcement_repo,
            announcement_service,
            auth_service,
            csrf_service,
        }
    }
}
