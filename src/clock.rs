use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::date::PageDate;
use crate::page::PageContext;
use crate::store::{FAKE_DATE_KEY, TICK_START_KEY};

/// One argument of a date call crossing the injected-call channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum DateArg {
    Number(i64),
    Text(String),
    Date(PageDate),
}

/// The interception layer over the page's date entry points.
///
/// Only the no-argument forms are intercepted: they read the session store
/// lazily on every query and decide between the real instant, a frozen fake
/// instant, and a fake instant advanced by real elapsed time. Every
/// explicit-argument form delegates straight to [`PageDate`] and never
/// consults the store.
pub struct ClockOverride {
    ctx: Arc<PageContext>,
}

impl ClockOverride {
    /// Installs the override on a context. Registers the activation signal
    /// (once per context) so external probes can confirm installation
    /// without touching clock behavior.
    pub fn install(ctx: &Arc<PageContext>) -> Self {
        if !ctx.has_activation_hook() {
            let hook_ctx = Arc::clone(ctx);
            ctx.set_activation_hook(move || {
                debug!(
                    host = %hook_ctx.host(),
                    fake_date = %hook_ctx.storage_get(FAKE_DATE_KEY).unwrap_or_default(),
                    "fake date setting refreshed"
                );
            });
        }
        Self {
            ctx: Arc::clone(ctx),
        }
    }

    pub fn is_installed(&self) -> bool {
        self.ctx.has_activation_hook()
    }

    /// The no-argument construction form.
    ///
    /// No fake date stored: the real current instant. Fake date stored
    /// without a tick start: the frozen instant, reparsed from the stored
    /// string on every call. Fake date plus tick start: the fake instant
    /// advanced by real elapsed time since the recorded anchor. A stored
    /// string that fails to parse degrades to the invalid instant.
    pub fn now(&self) -> PageDate {
        let Some(stored) = self
            .ctx
            .storage_get(FAKE_DATE_KEY)
            .filter(|value| !value.is_empty())
        else {
            return PageDate::now_real();
        };

        let fake = PageDate::parse(&stored);
        if fake.is_invalid() {
            warn!(value = %stored, "stored fake date does not parse; producing invalid instant");
            return fake;
        }
        self.advance_by_tick(fake)
    }

    /// The static now query: epoch milliseconds for the same instant
    /// [`Self::now`] would produce.
    pub fn now_millis(&self) -> Option<i64> {
        self.now().epoch_millis()
    }

    /// The callable-without-`new` form: ignores every argument and
    /// stringifies the instant [`Self::now`] produces, so the two forms can
    /// never disagree.
    pub fn call(&self, args: &[DateArg]) -> String {
        if !args.is_empty() {
            debug!(
                count = args.len(),
                "arguments to the string call form are ignored"
            );
        }
        self.now().to_string()
    }

    /// Construction-form dispatch, matching the page's own rules by argument
    /// count. Only the empty form goes through the fake-clock decision.
    pub fn construct(&self, args: &[DateArg]) -> PageDate {
        match args {
            [] => self.now(),
            [DateArg::Number(millis)] => PageDate::from_epoch_millis(*millis),
            [DateArg::Text(input)] => PageDate::parse(input),
            [DateArg::Date(other)] => *other,
            _ => Self::construct_from_components(args),
        }
    }

    fn construct_from_components(args: &[DateArg]) -> PageDate {
        // year, month, day, hour, minute, second, ms; day defaults to 1,
        // later fields to 0, extras beyond the seventh are ignored.
        let mut parts = [0i64, 0, 1, 0, 0, 0, 0];
        for (slot, arg) in parts.iter_mut().zip(args) {
            match arg {
                DateArg::Number(value) => *slot = *value,
                _ => return PageDate::invalid(),
            }
        }
        PageDate::from_components(
            parts[0], parts[1], parts[2], parts[3], parts[4], parts[5], parts[6],
        )
    }

    fn advance_by_tick(&self, fake: PageDate) -> PageDate {
        let Some(start) = self.ctx.storage_get(TICK_START_KEY) else {
            return fake;
        };
        let Ok(start_ms) = start.parse::<i64>() else {
            warn!(value = %start, "tick start is not epoch milliseconds; clock stays frozen");
            return fake;
        };
        let (Some(base_ms), Some(real_now_ms)) =
            (fake.epoch_millis(), PageDate::now_real().epoch_millis())
        else {
            return fake;
        };
        match real_now_ms
            .checked_sub(start_ms)
            .and_then(|elapsed| base_ms.checked_add(elapsed))
        {
            Some(ticked_ms) => PageDate::from_epoch_millis(ticked_ms),
            None => fake,
        }
    }
}
