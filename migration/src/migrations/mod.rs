pub mod m202505290001_create_users;
pub mod m202505290002_create_modules;
pub mod m202505290003_create_user_module_roles;
pub mod m202509080001_create_attendance;
