pub mod events;
pub mod position;
pub mod redirect;
pub mod resolver;
pub mod tab_service;

pub use events::{EventDispatcher, LoggingListener, TabsEvent, TabsListener};
pub use position::PositionChange;
pub use redirect::AdminUrls;
pub use tab_service::{SavedTab, TabService};
