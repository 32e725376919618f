//! The tracing side: a subscriber that turns info events into table rows.

use std::cell::RefCell;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Metadata, Subscriber};

use crate::table::{Cell, Recorder};

thread_local! {
    pub(crate) static RECORDER: RefCell<Recorder> = RefCell::default();
}

/// Collects an event's fields in declaration order.
#[derive(Default)]
struct RowVisitor {
    row: Vec<(String, Cell)>,
}

impl RowVisitor {
    fn put(&mut self, field: &Field, cell: Cell) {
        self.row.push((field.name().to_string(), cell));
    }
}

impl Visit for RowVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Cell::U64(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Cell::I64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Cell::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Cell::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Cell::Str(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // Free-text `message` fields are not columns
        if field.name() == "message" {
            return;
        }
        self.put(field, Cell::Str(format!("{:?}", value)));
    }
}

/// Tracing subscriber that writes every info-or-above event into the
/// thread-local recorder, one table per target. Spans are ignored.
pub struct DataFrameSubscriber;

impl Subscriber for DataFrameSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= tracing::Level::INFO
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut visitor = RowVisitor::default();
        event.record(&mut visitor);
        let target = event.metadata().target();
        RECORDER.with(|r| r.borrow_mut().push(target, visitor.row));
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Install the DataFrameSubscriber as the global default. Later calls are
/// no-ops, so every test can call it.
pub fn install_subscriber() {
    let _ = tracing::subscriber::set_global_default(DataFrameSubscriber);
}

/// Take everything recorded on this thread, leaving the recorder empty.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

pub fn clear() {
    RECORDER.with(|r| *r.borrow_mut() = Recorder::default());
}
