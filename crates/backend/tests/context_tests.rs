use backend::{
    Device, InferError, ModelLoad, NativeRequest, NativeTensor, Result, Runtime, RuntimeContext,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct CountingRuntime {
    id: usize,
}

struct NoRequest;

impl NativeRequest for NoRequest {
    fn input_names(&self) -> &[String] {
        &[]
    }

    fn output_names(&self) -> &[String] {
        &[]
    }

    fn infer(
        &mut self,
        _inputs: Vec<(String, NativeTensor)>,
    ) -> Result<Vec<(String, NativeTensor)>> {
        Ok(Vec::new())
    }
}

impl Runtime for CountingRuntime {
    type Model = ();
    type Request = NoRequest;

    fn name(&self) -> &str {
        "counting"
    }

    fn read_model(&self, _load: ModelLoad) -> Result<()> {
        Ok(())
    }

    fn compile_model(&self, _model: &(), _device: &Device) -> Result<NoRequest> {
        Ok(NoRequest)
    }
}

#[tokio::test]
async fn test_context_is_lazy() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let context = RuntimeContext::new(move || {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        Ok(CountingRuntime { id })
    });

    assert!(context.get().is_none());
    assert_eq!(inits.load(Ordering::SeqCst), 0);

    let first = context.get_or_create().await.unwrap();
    let second = context.get_or_create().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(inits.load(Ordering::SeqCst), 1);
    assert!(context.get().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_use_builds_once() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let context = Arc::new(RuntimeContext::new(move || {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        Ok(CountingRuntime { id })
    }));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let context = Arc::clone(&context);
        handles.push(tokio::spawn(async move { context.get_or_create().await.map(|r| r.id) }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 0);
    }
    assert_eq!(inits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_construction_is_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let context = RuntimeContext::new(move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        if attempt == 0 {
            Err(InferError::Config("plugins not ready".to_string()))
        } else {
            Ok(CountingRuntime { id: attempt })
        }
    });

    assert!(matches!(context.get_or_create().await, Err(InferError::Config(_))));
    assert!(context.get().is_none());
    assert_eq!(context.get_or_create().await.unwrap().id, 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_with_runtime_is_ready() {
    let context = RuntimeContext::with_runtime(CountingRuntime { id: 7 });
    assert_eq!(context.get().unwrap().id, 7);
    assert_eq!(context.get_or_create().await.unwrap().name(), "counting");
}
