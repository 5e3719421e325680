use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Table-wide event bus
///
/// Handlers are registered per event type and run synchronously, in
/// subscription order, on the publishing thread.
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Events emitted by table commands
pub mod events {
    use super::Event;
    use crate::filter::FilterCondition;
    use crate::sorting::ColumnSort;

    /// The filter list changed
    #[derive(Debug, Clone)]
    pub struct FiltersChanged {
        pub filters: Vec<FilterCondition>,
    }

    /// The search query changed
    #[derive(Debug, Clone)]
    pub struct SearchChanged {
        pub query: String,
    }

    /// The sort order changed
    #[derive(Debug, Clone)]
    pub struct SortingChanged {
        pub sorting: Vec<ColumnSort>,
    }

    /// The page or page size changed
    #[derive(Debug, Clone)]
    pub struct PaginationChanged {
        pub page: usize,
        pub per_page: usize,
    }

    /// The grouping column changed
    #[derive(Debug, Clone)]
    pub struct GroupingChanged {
        pub group_by: Option<String>,
    }

    /// A group was expanded or collapsed
    #[derive(Debug, Clone)]
    pub struct GroupToggled {
        pub key: String,
        pub expanded: bool,
    }

    /// Column order, sizes or visibility changed
    #[derive(Debug, Clone)]
    pub struct ColumnLayoutChanged {
        pub column_order: Vec<String>,
    }

    /// The view state went back to its defaults
    #[derive(Debug, Clone)]
    pub struct ViewStateReset {
        pub key: String,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        FiltersChanged,
        SearchChanged,
        SortingChanged,
        PaginationChanged,
        GroupingChanged,
        GroupToggled,
        ColumnLayoutChanged,
        ViewStateReset
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Subscribe a closure that receives the concrete event type
    pub fn subscribe_fn<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event: &dyn Event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }

    /// Number of handlers registered for an event type
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&std::any::TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
