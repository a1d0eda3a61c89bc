// tests/registry_tests.rs
mod common;

use common::*;
use stepflow::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult, Stepflow};

#[derive(Clone, Debug, Default)]
struct OrderCtx {
  order_no: String,
}

#[derive(Clone, Debug, Default)]
struct RefundCtx {
  refunded_cents: i64,
}

#[tokio::test]
async fn dispatches_by_context_type() {
  setup_tracing();
  let registry = Stepflow::<TestError>::new();

  let mut orders = Pipeline::<OrderCtx, TestError>::new(&[("assign", false, None)]);
  orders.on_root("assign", |ctx: ContextData<OrderCtx>| async move {
    ctx.write().order_no = "ord_1".to_string();
    Ok::<PipelineControl, FlowError>(PipelineControl::Continue)
  });
  registry.register_pipeline(orders);

  let mut refunds = Pipeline::<RefundCtx, TestError>::new(&[("refund", false, None)]);
  refunds.on_root("refund", |ctx: ContextData<RefundCtx>| async move {
    ctx.write().refunded_cents = 999;
    Ok::<PipelineControl, FlowError>(PipelineControl::Continue)
  });
  registry.register_pipeline(refunds);

  assert!(registry.is_registered::<OrderCtx>());
  assert!(registry.is_registered::<RefundCtx>());

  let order_ctx = ContextData::new(OrderCtx::default());
  assert_eq!(registry.run(order_ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(order_ctx.read().order_no, "ord_1");

  let refund_ctx = ContextData::new(RefundCtx::default());
  assert_eq!(registry.run(refund_ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(refund_ctx.read().refunded_cents, 999);
}

#[tokio::test]
async fn unregistered_context_type_is_configuration_error() {
  setup_tracing();
  let registry = Stepflow::<TestError>::new();

  #[derive(Clone, Debug, Default)]
  struct UnregisteredCtx;

  let result = registry.run(ContextData::new(UnregisteredCtx)).await;
  match result {
    Err(TestError::Flow(s)) => {
      assert!(s.contains("ConfigurationError"));
      assert!(s.contains("UnregisteredCtx"));
    }
    other => panic!("Expected ConfigurationError, got {:?}", other),
  }
}

#[tokio::test]
async fn handler_error_reaches_registry_caller() {
  setup_tracing();
  let registry = Stepflow::<TestError>::new();
  let mut pipeline = Pipeline::<OrderCtx, TestError>::new(&[("assign", false, None)]);
  pipeline.on_root("assign", |_ctx: ContextData<OrderCtx>| async move {
    Err::<PipelineControl, TestError>(TestError::Handler("store down".to_string()))
  });
  registry.register_pipeline(pipeline);

  let result = registry.run(ContextData::new(OrderCtx::default())).await;
  assert_eq!(result.unwrap_err(), TestError::Handler("store down".to_string()));
}

#[tokio::test]
async fn later_registration_replaces_earlier_one() {
  setup_tracing();
  let registry: Stepflow = Stepflow::default();

  let mut first = Pipeline::<OrderCtx, FlowError>::new(&[("assign", false, None)]);
  first.on_root("assign", |ctx: ContextData<OrderCtx>| async move {
    ctx.write().order_no = "first".to_string();
    Ok::<PipelineControl, FlowError>(PipelineControl::Continue)
  });
  registry.register_pipeline(first);

  let mut second = Pipeline::<OrderCtx, FlowError>::new(&[("assign", false, None)]);
  second.on_root("assign", |ctx: ContextData<OrderCtx>| async move {
    ctx.write().order_no = "second".to_string();
    Ok::<PipelineControl, FlowError>(PipelineControl::Continue)
  });
  registry.register_pipeline(second);

  let ctx = ContextData::new(OrderCtx::default());
  registry.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().order_no, "second");
}
