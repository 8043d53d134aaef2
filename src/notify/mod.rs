pub mod dispatcher;
pub mod relay;
pub mod templates;

pub use dispatcher::{DeliveryPath, DispatchResult, NotificationDispatcher, Notifier};
pub use relay::{EmailJsRelay, MessageRelay, RelayCredentials, RelayError};
pub use templates::{NotifyConfig, TemplateParams};
