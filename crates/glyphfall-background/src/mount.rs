//! Mounting the background onto a scheduler.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::entropy::Entropy;
use crate::renderer::{BackgroundRenderer, TICK_INTERVAL};
use crate::scheduler::{IntervalHandle, ListenerHandle, Scheduler};
use crate::surface::{Surface, SurfaceProvider};

/// A background attached to a scheduler.
///
/// Holds the repaint interval and the resize listener. Dropping it, or
/// calling [`MountedBackground::unmount`], releases both.
#[derive(Debug)]
pub struct MountedBackground<S, E> {
    renderer: Rc<RefCell<BackgroundRenderer<S, E>>>,
    repaint: IntervalHandle,
    resize: ListenerHandle,
}

/// Acquire a surface and start animating it.
///
/// Returns `None` when no surface is available; nothing is registered with
/// the scheduler in that case.
pub fn mount<P, E>(
    scheduler: &Scheduler,
    provider: &mut P,
    entropy: E,
) -> Option<MountedBackground<P::Surface, E>>
where
    P: SurfaceProvider,
    P::Surface: 'static,
    E: Entropy + 'static,
{
    let surface = match provider.acquire() {
        Ok(surface) => surface,
        Err(err) => {
            tracing::debug!(%err, "background not mounted");
            return None;
        }
    };

    let viewport = scheduler.viewport();
    let renderer = Rc::new(RefCell::new(BackgroundRenderer::new(
        surface, viewport, entropy,
    )));

    let resize = {
        let renderer = Rc::clone(&renderer);
        scheduler.on_resize(move |viewport| renderer.borrow_mut().resize(viewport))
    };
    let repaint = {
        let renderer = Rc::clone(&renderer);
        scheduler.set_interval(TICK_INTERVAL, move || renderer.borrow_mut().tick())
    };

    tracing::info!(
        width = viewport.width,
        height = viewport.height,
        columns = renderer.borrow().drops().len(),
        "background mounted"
    );

    Some(MountedBackground {
        renderer,
        repaint,
        resize,
    })
}

impl<S: Surface, E: Entropy> MountedBackground<S, E> {
    /// Borrow the renderer, e.g. to present its surface.
    pub fn renderer(&self) -> Ref<'_, BackgroundRenderer<S, E>> {
        self.renderer.borrow()
    }

    /// Run `f` against the renderer.
    pub fn with_renderer<R>(&self, f: impl FnOnce(&BackgroundRenderer<S, E>) -> R) -> R {
        f(&self.renderer.borrow())
    }

    /// Detach from the scheduler and drop the renderer.
    pub fn unmount(self) {
        let MountedBackground {
            renderer,
            repaint,
            resize,
        } = self;
        repaint.cancel();
        resize.cancel();
        tracing::info!(ticks = renderer.borrow().ticks(), "background unmounted");
    }
}
