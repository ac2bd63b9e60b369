//! `customSync` and `customAsync`: user functions embedded as schema steps.

use super::{Keyword, KeywordContext, KeywordOutcome};
use crate::engine::ErrorParams;
use crate::error::HookResult;
use crate::schema::{AsyncHook, SyncHook};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

fn into_outcome(result: HookResult<Option<Value>>) -> KeywordOutcome {
    match result {
        Ok(Some(next)) => KeywordOutcome::Replace(next),
        Ok(None) => KeywordOutcome::Unchanged,
        Err(err) => KeywordOutcome::Invalid(ErrorParams::Custom {
            message: err.message,
        }),
    }
}

impl Keyword for SyncHook {
    fn name(&self) -> &'static str {
        "customSync"
    }

    fn run<'a>(
        &'a self,
        value: &'a Value,
        ctx: KeywordContext<'_>,
    ) -> BoxFuture<'a, KeywordOutcome> {
        let result = self.call(value);
        if let Err(err) = &result {
            log::trace!("customSync rejected '{}': {}", ctx.path, err);
        }
        future::ready(into_outcome(result)).boxed()
    }
}

impl Keyword for AsyncHook {
    fn name(&self) -> &'static str {
        "customAsync"
    }

    fn is_async(&self) -> bool {
        true
    }

    fn run<'a>(
        &'a self,
        value: &'a Value,
        ctx: KeywordContext<'_>,
    ) -> BoxFuture<'a, KeywordOutcome> {
        log::trace!("customAsync awaiting '{}'", ctx.path);
        self.call(value.clone()).map(into_outcome).boxed()
    }
}
