pub mod logging_overlay;

use crate::core::models::SurfaceHandle;
use crate::core::traits::OverlayHost;
use anyhow::Result;
use tracing::warn;

/// An overlay attached to a live surface.
///
/// Attach happens once in `attach`, detach once in `detach` (or on drop if
/// the owner forgot). The owner must detach before destroying the surface.
pub struct OverlayAttachment {
    host: Box<dyn OverlayHost>,
    surface: SurfaceHandle,
    attached: bool,
}

impl OverlayAttachment {
    pub fn attach(mut host: Box<dyn OverlayHost>, surface: &SurfaceHandle) -> Result<Self> {
        host.attach(surface)?;

        Ok(Self {
            host,
            surface: surface.clone(),
            attached: true,
        })
    }

    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    pub fn detach(mut self) {
        self.detach_once();
    }

    fn detach_once(&mut self) {
        if self.attached {
            self.host.detach();
            self.attached = false;
        }
    }
}

impl Drop for OverlayAttachment {
    fn drop(&mut self) {
        if self.attached {
            warn!(surface = self.surface.id, "overlay dropped while attached");
            self.detach_once();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct CountingOverlay {
        attaches: Rc<RefCell<u32>>,
        detaches: Rc<RefCell<u32>>,
    }

    impl OverlayHost for CountingOverlay {
        fn attach(&mut self, _surface: &SurfaceHandle) -> Result<()> {
            *self.attaches.borrow_mut() += 1;
            Ok(())
        }

        fn detach(&mut self) {
            *self.detaches.borrow_mut() += 1;
        }
    }

    fn counting() -> (Box<dyn OverlayHost>, Rc<RefCell<u32>>, Rc<RefCell<u32>>) {
        let attaches = Rc::new(RefCell::new(0));
        let detaches = Rc::new(RefCell::new(0));
        let host = CountingOverlay {
            attaches: Rc::clone(&attaches),
            detaches: Rc::clone(&detaches),
        };
        (Box::new(host), attaches, detaches)
    }

    #[test]
    fn attach_and_detach_happen_once() {
        let (host, attaches, detaches) = counting();
        let surface = SurfaceHandle::new("player");

        let attachment = OverlayAttachment::attach(host, &surface).unwrap();
        assert_eq!(attachment.surface(), &surface);
        attachment.detach();

        assert_eq!(*attaches.borrow(), 1);
        assert_eq!(*detaches.borrow(), 1);
    }

    #[test]
    fn drop_detaches_a_forgotten_overlay() {
        let (host, _attaches, detaches) = counting();
        {
            let _attachment = OverlayAttachment::attach(host, &SurfaceHandle::new("player")).unwrap();
        }
        assert_eq!(*detaches.borrow(), 1);
    }
}
