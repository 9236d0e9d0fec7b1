//! Call-recording spy replacements.

use crate::value::Value;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Delegate a [`Fake`] may forward calls to. It receives the spy itself,
/// so count-dependent behavior can inspect [`Fake::call_count`].
type Callback = dyn Fn(&Fake, &[Value]) -> Value + Send + Sync;

/// One recorded invocation.
#[derive(Debug, Clone, Default)]
pub struct CallRecord {
    args: Vec<Value>,
}

impl CallRecord {
    /// All positional arguments, in call order.
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Argument at `index`.
    #[inline]
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// First argument.
    #[inline]
    #[must_use]
    pub fn first_arg(&self) -> Option<&Value> {
        self.arg(0)
    }

    /// Second argument.
    #[inline]
    #[must_use]
    pub fn second_arg(&self) -> Option<&Value> {
        self.arg(1)
    }

    /// Last argument.
    #[inline]
    #[must_use]
    pub fn last_arg(&self) -> Option<&Value> {
        self.args.last()
    }
}

/// A spy: a callable replacement that records its invocations.
///
/// Handles are cheap clones sharing one record log, so a test keeps one
/// handle for assertions while the registry serves another to the code
/// under test.
#[derive(Clone, Default)]
pub struct Fake {
    calls: Arc<Mutex<Vec<CallRecord>>>,
    callback: Option<Arc<Callback>>,
}

impl Fake {
    /// Spy with no delegate; calls record and return `None`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spy forwarding each call to `callback` and returning its result.
    pub fn with_callback(
        callback: impl Fn(&Fake, &[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Arc::default(),
            callback: Some(Arc::new(callback)),
        }
    }

    /// Invoke the spy. The record is written before the delegate runs, so
    /// a delegate reading [`Fake::call_count`] observes the current call.
    pub fn call(&self, args: Vec<Value>) -> Option<Value> {
        self.calls.lock().push(CallRecord { args: args.clone() });
        self.callback.as_ref().map(|callback| callback(self, &args))
    }

    /// True once called at least once.
    #[inline]
    #[must_use]
    pub fn called(&self) -> bool {
        !self.calls.lock().is_empty()
    }

    /// Total number of invocations.
    #[inline]
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Snapshot of every record, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().clone()
    }

    /// First recorded call.
    #[must_use]
    pub fn first_call(&self) -> Option<CallRecord> {
        self.calls.lock().first().cloned()
    }

    /// Second recorded call.
    #[must_use]
    pub fn second_call(&self) -> Option<CallRecord> {
        self.calls.lock().get(1).cloned()
    }

    /// Most recent call.
    #[must_use]
    pub fn last_call(&self) -> Option<CallRecord> {
        self.calls.lock().last().cloned()
    }
}

impl fmt::Debug for Fake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fake")
            .field("call_count", &self.call_count())
            .field("delegating", &self.callback.is_some())
            .finish()
    }
}

/// New spy with no delegate.
#[inline]
#[must_use]
pub fn fake() -> Fake {
    Fake::new()
}

/// New spy forwarding calls to `callback`.
pub fn fake_with(callback: impl Fn(&Fake, &[Value]) -> Value + Send + Sync + 'static) -> Fake {
    Fake::with_callback(callback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let spy = Fake::new();
        assert!(!spy.called());

        spy.call(vec![Value::new("a")]);
        spy.call(vec![Value::new("b"), Value::new(2_i32)]);

        assert!(spy.called());
        assert_eq!(spy.call_count(), 2);
        let second = spy.second_call().unwrap();
        assert_eq!(second.first_arg().unwrap().downcast_ref::<&str>(), Some(&"b"));
        assert_eq!(second.second_arg().unwrap().downcast_ref::<i32>(), Some(&2));
        assert_eq!(second.last_arg().unwrap().downcast_ref::<i32>(), Some(&2));
    }

    #[test]
    fn first_and_last_call_accessors() {
        let spy = Fake::new();
        spy.call(vec![Value::new(1_u8)]);
        spy.call(vec![Value::new(2_u8)]);
        spy.call(vec![Value::new(3_u8)]);

        let first = spy.first_call().unwrap();
        let last = spy.last_call().unwrap();
        assert_eq!(first.first_arg().unwrap().downcast_ref::<u8>(), Some(&1));
        assert_eq!(last.first_arg().unwrap().downcast_ref::<u8>(), Some(&3));
    }

    #[test]
    fn delegate_sees_the_updated_count() {
        let spy = fake_with(|spy, _args| Value::new(spy.call_count()));
        let result = spy.call(vec![]).unwrap();
        assert_eq!(result.downcast_ref::<usize>(), Some(&1));
    }

    #[test]
    fn delegate_result_is_returned() {
        let spy = fake_with(|_, args| {
            let letter = args[0].downcast_ref::<&str>().unwrap();
            Value::new(format!("{letter}!"))
        });
        let result = spy.call(vec![Value::new("a")]).unwrap();
        assert_eq!(result.downcast_ref::<String>(), Some(&"a!".to_owned()));
    }

    #[test]
    fn count_dependent_delegate() {
        let spy = fake_with(|spy, args| {
            let letter = args[0].downcast_ref::<&str>().unwrap();
            let bump = if spy.call_count() == 1 { 1 } else { 2 };
            Value::new(format!("{letter}{bump}"))
        });
        let first = spy.call(vec![Value::new("a")]).unwrap();
        let second = spy.call(vec![Value::new("b")]).unwrap();
        assert_eq!(first.downcast_ref::<String>(), Some(&"a1".to_owned()));
        assert_eq!(second.downcast_ref::<String>(), Some(&"b2".to_owned()));
    }

    #[test]
    fn clones_share_the_record_log() {
        let spy = Fake::new();
        let handle = spy.clone();
        spy.call(vec![]);
        assert_eq!(handle.call_count(), 1);
    }

    #[test]
    fn spy_without_delegate_returns_none() {
        let spy = Fake::new();
        assert!(spy.call(vec![Value::new(())]).is_none());
    }
}
