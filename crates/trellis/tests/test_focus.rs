//! Integration tests for focus behavior.

#[cfg(test)]
mod tests {
    use trellis::{
        Aabb, Context, Core, FocusManager, MouseButton, NodeContext, Panel, Signal, Vec2,
        backend::test::{TestInput, TestRender},
        error::{Error, Result},
    };

    #[test]
    fn never_two_focused_at_once() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        let ids: Vec<_> = (0..5)
            .map(|_| core.create(root, Panel).map(|t| t.node()))
            .collect::<Result<_>>()?;

        for id in ids.iter().chain(ids.iter().rev()) {
            core.gain_exclusive_focus(*id)?;
            let focused: Vec<_> = ids
                .iter()
                .filter(|i| core.node(**i).is_some_and(|n| n.is_focused()))
                .collect();
            assert_eq!(focused, vec![id]);
            assert_eq!(core.focused(), Some(*id));
        }

        core.clear_focus();
        assert!(ids.iter().all(|i| !core.is_focused(*i)));
        Ok(())
    }

    #[test]
    fn regaining_focus_is_a_noop() -> Result<()> {
        let mut core = Core::new();
        let a = core.create_root(Panel).node();
        core.gain_exclusive_focus(a)?;
        core.gain_exclusive_focus(a)?;
        assert!(core.is_focused(a));
        assert!(core.node(a).is_some_and(|n| n.is_focused()));
        Ok(())
    }

    #[test]
    fn focus_released_at_end_of_frame_when_destroyed() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        let child = core.create(root, Panel)?.node();
        core.gain_exclusive_focus(child)?;

        core.begin_frame();
        core.destroy_recursive(child)?;
        assert_eq!(core.focused(), None);
        core.end_frame();
        assert_eq!(core.focused(), None);
        assert_eq!(core.gain_exclusive_focus(child), Err(Error::NodeNotFound(child)));
        Ok(())
    }

    #[test]
    fn handlers_can_move_focus() -> Result<()> {
        let mut ctx = Context::new(TestInput::new(), TestRender::new());
        let button = ctx.core_mut().create_root(Panel).node();
        let target = ctx.core_mut().create_root(Panel).node();
        ctx.core_mut().set_bounds(
            button,
            Aabb::from_corners(Vec2::ZERO, Vec2::new(10.0, 10.0)),
        )?;
        ctx.core_mut()
            .connect(button, Signal::LeftClick, move |c: &mut dyn NodeContext| {
                c.core_mut().gain_exclusive_focus(target)
            })?;

        ctx.input_mut().move_mouse((5.0, 5.0));
        ctx.input_mut().press(MouseButton::Left);
        ctx.tick(0.0)?;
        assert_eq!(ctx.core().focused(), Some(button));

        ctx.input_mut().clear_events();
        ctx.input_mut().release(MouseButton::Left);
        ctx.tick(0.0)?;
        assert_eq!(ctx.core().focused(), Some(target));
        assert!(!ctx.core().is_focused(button));
        Ok(())
    }
}
