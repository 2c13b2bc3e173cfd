mod api_test;
mod gamification_test;
mod helpers;
mod session_test;
mod ticket_test;
