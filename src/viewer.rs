//! Interactive viewer state.
//!
//! [`Viewer`] is the boundary a host shell talks to. The shell decodes its
//! own pointer and keyboard events and forwards them here; the viewer maps
//! them onto projection mutators and renders frames on request. It never
//! reads raw input itself.
//!
//! Interaction rules:
//!
//! | Input                              | Effect                          |
//! |------------------------------------|---------------------------------|
//! | drag (primary button)              | rotate                          |
//! | drag (secondary button or Alt)     | pan                             |
//! | drag with rotate key held          | rotate                          |
//! | scroll                             | zoom (down = out, up = in)      |
//! | scroll with rotate key held        | rotate                          |

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::PointCloud;
use crate::projection::Projection;
use crate::scene::{FrameComposer, SceneStyle, Viewport};

/// Pointer button as decoded by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    /// Usually the wheel button.
    Tertiary,
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Alt / Option.
    pub alt: bool,
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        alt: false,
        shift: false,
        ctrl: false,
    };

    /// Only Alt held.
    pub const ALT: Self = Self {
        alt: true,
        shift: false,
        ctrl: false,
    };
}

/// What a drag gesture does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Drag deltas rotate the view.
    Rotate,
    /// Drag deltas move the view.
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    mode: DragMode,
    last: (f64, f64),
}

/// Cloud, projection and pointer state of one interactive view.
#[derive(Debug, Clone)]
pub struct Viewer {
    cloud: PointCloud,
    projection: Projection,
    composer: FrameComposer,
    hover: Option<(f64, f64)>,
    drag: Option<Drag>,
    rotate_key: bool,
}

impl Viewer {
    /// Create a viewer with the default style and viewport.
    #[must_use]
    pub fn new(cloud: PointCloud) -> Self {
        Self::with_style(cloud, SceneStyle::default())
    }

    /// Create a viewer with a custom style.
    #[must_use]
    pub fn with_style(cloud: PointCloud, style: SceneStyle) -> Self {
        Self {
            cloud,
            projection: Projection::default(),
            composer: FrameComposer::new(style),
            hover: None,
            drag: None,
            rotate_key: false,
        }
    }

    /// The displayed cloud.
    #[must_use]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Current projection state.
    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Mutable projection state, for shells that drive it directly.
    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }

    /// Last known pointer position.
    #[must_use]
    pub fn hover(&self) -> Option<(f64, f64)> {
        self.hover
    }

    /// Active drag mode, if a drag is in progress.
    #[must_use]
    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.map(|d| d.mode)
    }

    /// Whether the rotate key is currently held.
    #[must_use]
    pub fn rotate_key(&self) -> bool {
        self.rotate_key
    }

    /// Record the rotate key state.
    pub fn set_rotate_key(&mut self, held: bool) {
        self.rotate_key = held;
    }

    /// Start a drag.
    pub fn pointer_down(
        &mut self,
        button: PointerButton,
        modifiers: Modifiers,
        position: (f64, f64),
    ) {
        let mode = if self.rotate_key {
            DragMode::Rotate
        } else if button == PointerButton::Secondary || modifiers.alt {
            DragMode::Pan
        } else {
            DragMode::Rotate
        };
        log::trace!("pointer down {button:?} at {position:?}: {mode:?}");
        self.drag = Some(Drag {
            mode,
            last: position,
        });
    }

    /// Update the hover position and apply any drag delta.
    pub fn pointer_moved(&mut self, position: (f64, f64)) {
        self.hover = Some(position);

        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let dx = position.0 - drag.last.0;
        let dy = position.1 - drag.last.1;
        drag.last = position;

        if self.rotate_key || drag.mode == DragMode::Rotate {
            self.projection.rotate_by(dx, dy);
        } else {
            self.projection.pan_by(dx, dy);
        }
    }

    /// End the drag.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Pointer left the view; hover labels disappear.
    pub fn pointer_left(&mut self) {
        self.hover = None;
    }

    /// Apply a scroll delta.
    ///
    /// With the rotate key held the delta rotates. Otherwise a negative `dy`
    /// zooms out, a positive one zooms in and zero does nothing.
    pub fn scrolled(&mut self, dx: f64, dy: f64) {
        if self.rotate_key {
            self.projection.rotate_by_scroll(dx, dy);
        } else if dy < 0.0 {
            self.projection.zoom_out();
        } else if dy > 0.0 {
            self.projection.zoom_in();
        }
    }

    /// Restore the default view; the viewport is kept.
    pub fn reset_view(&mut self) {
        self.projection.reset();
    }

    /// Swap in a new cloud and reset the view.
    pub fn replace_cloud(&mut self, cloud: PointCloud) {
        log::debug!("replacing cloud: {} -> {} points", self.cloud.len(), cloud.len());
        self.cloud = cloud;
        self.reset_view();
    }

    /// Resize and render a frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`](crate::Error::InvalidDimensions)
    /// for a zero-sized viewport.
    pub fn render(&mut self, viewport: Viewport) -> Result<Framebuffer> {
        use batuta_common::display::WithDimensions;

        let frame = self
            .composer
            .compose(&self.cloud, &self.projection, viewport, self.hover)?;
        self.projection.set_dimensions(viewport.width, viewport.height);
        Ok(frame)
    }
}
