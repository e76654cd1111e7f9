//! Drive a small widget tree without a window: a button that toggles a label,
//! clicked by a scripted mouse.

use std::{cell::Cell, rc::Rc};

use tracing::{Level, info};
use trellis::{
    Anchor, Context, Label, MouseButton, NodeContext, Panel, Result, Scaling, Signal, Vec2,
    backend::test::{TestInput, TestRender},
};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let mut ctx = Context::new(TestInput::new(), TestRender::new());
    let core = ctx.core_mut();

    let window = core.create_root(Panel).node();
    core.set_container(window, true)?;
    core.set_scaling(window, Scaling::FitToChildren)?;
    core.set_padding(window, 10.0)?;

    let button = core.create(window, Label::new("toggle"))?.node();
    core.set_position(button, (100.0, 100.0))?;
    core.set_size(button, (80.0, 24.0))?;

    let status = core.create(window, Label::new("shown"))?;
    core.set_size(status, (80.0, 24.0))?;
    core.attach(status, Anchor::Top, button, Anchor::Bottom, (0.0, 8.0))?;

    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    core.connect(button, Signal::LeftClick, move |c: &mut dyn NodeContext| {
        counter.set(counter.get() + 1);
        let label = c.core_mut().widget_mut(status)?;
        label.text = if label.text == "shown" {
            "hidden".into()
        } else {
            "shown".into()
        };
        Ok(())
    })?;

    for frame in 0..4 {
        ctx.input_mut().move_mouse(Vec2::new(100.0, 100.0));
        if frame % 2 == 0 {
            ctx.input_mut().press(MouseButton::Left);
        } else {
            ctx.input_mut().release(MouseButton::Left);
        }
        ctx.tick(1.0 / 60.0)?;
        ctx.input_mut().clear_events();

        ctx.sink_mut().reset();
        ctx.draw()?;
        info!(
            frame,
            clicks = clicks.get(),
            window = ?ctx.core().bounds(window)?,
            quads = ctx.sink().quad_count(),
            "frame done"
        );
    }

    for drawable in &ctx.sink().drawables {
        info!(?drawable, "drawn");
    }
    Ok(())
}
