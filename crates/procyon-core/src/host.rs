use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::buffer::ImageBuffer;
use crate::error::Result;
use crate::io::image_io;

/// Connection to the image-processing host application.
///
/// The host owns "the current loaded image"; every command operates on it by
/// reference. Modeling the session as an explicit handle (rather than ambient
/// global state) keeps the pipeline testable against a fake host.
pub trait HostSession: Send {
    /// Issue a named command with positional string arguments.
    fn send_command(&mut self, name: &str, args: &[String]) -> Result<()>;

    /// Path of the image the session currently has loaded.
    fn image_path(&mut self) -> Result<PathBuf>;

    /// Dimensions of the current image as (channels, height, width).
    fn image_dimensions(&mut self) -> Result<(usize, usize, usize)>;

    /// Replace the current image with the one at `path`.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Persist the current image to `path`.
    fn save(&mut self, path: &Path) -> Result<()>;
}

/// Host session with no host attached.
///
/// Keeps the decoded image in memory, performs load/save against real files,
/// and logs host-delegated commands as no-ops. This is the moral equivalent
/// of the original tool's detached debug mode, and is what the CLI `run`
/// command and the pipeline tests drive.
pub struct LocalSession {
    path: PathBuf,
    work_dir: PathBuf,
    image: ImageBuffer,
}

impl LocalSession {
    /// Open `path` as the session's current image. The image's directory
    /// becomes the working directory for relative intermediate names.
    pub fn open(path: &Path) -> Result<Self> {
        let image = image_io::load_image(path)?;
        let work_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self {
            path: path.to_path_buf(),
            work_dir,
            image,
        })
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    /// Relative host-side names (e.g. "starless_result") resolve against the
    /// working directory, mirroring how a real host treats them.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }
}

impl HostSession for LocalSession {
    fn send_command(&mut self, name: &str, args: &[String]) -> Result<()> {
        debug!(command = name, ?args, "host command skipped (no host attached)");
        Ok(())
    }

    fn image_path(&mut self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }

    fn image_dimensions(&mut self) -> Result<(usize, usize, usize)> {
        Ok((self.image.channels(), self.image.height(), self.image.width()))
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let resolved = self.resolve(path);
        if !resolved.exists() {
            // Intermediates a skipped host command would have produced may be
            // missing; keep the current image so sequencing can continue.
            warn!(path = %resolved.display(), "load target missing, keeping current image");
            return Ok(());
        }
        self.image = image_io::load_image(&resolved)?;
        self.path = resolved;
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let resolved = self.resolve(path);
        debug!(path = %resolved.display(), "saving current image");
        image_io::save_image(&self.image, &resolved)
    }
}
