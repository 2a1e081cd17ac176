mod event;
mod sink;

pub use event::{Event, PayloadClusterClick, PayloadMarkerClick, PayloadViewportChange};

pub use sink::EventSink;
