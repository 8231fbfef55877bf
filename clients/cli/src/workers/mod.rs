pub mod core;
pub mod dispatcher;
pub mod poller;

pub use self::core::EventSender;
pub use dispatcher::{Request, RequestDispatcher};
pub use poller::AlertPoller;
