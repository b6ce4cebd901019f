pub mod user_service;
pub mod category_service;
pub mod listing_service;
pub mod requisition_service;
pub mod comment_service;
pub mod gamification_service;
pub mod complaint_service;
pub mod formation_service;
pub mod notification_service;
pub mod content_service;
