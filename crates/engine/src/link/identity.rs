use std::fs;
use std::io;
use std::path::Path;

/// Device and inode pair naming the storage behind a directory entry.
///
/// Two paths with equal identities are hardlinks of each other. Identities
/// from different devices never compare equal even when the inode numbers
/// collide.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    /// Creates an identity from raw numbers.
    #[must_use]
    pub const fn new(dev: u64, ino: u64) -> Self {
        Self { dev, ino }
    }

    /// Extracts the identity from metadata. `None` where the platform does not
    /// expose stable inode numbers.
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Option<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Some(Self::new(metadata.dev(), metadata.ino()))
        }
        #[cfg(not(unix))]
        {
            let _ = metadata;
            None
        }
    }

    /// Reads the identity of `path` without following a final symlink.
    pub fn of(path: &Path) -> io::Result<Option<Self>> {
        fs::symlink_metadata(path).map(|metadata| Self::from_metadata(&metadata))
    }

    /// Device number.
    #[must_use]
    pub const fn dev(self) -> u64 {
        self.dev
    }

    /// Inode number.
    #[must_use]
    pub const fn ino(self) -> u64 {
        self.ino
    }

    /// Returns `true` when both entries live on the same device.
    #[must_use]
    pub const fn same_device(self, other: Self) -> bool {
        self.dev == other.dev
    }
}

#[cfg(test)]
mod tests {
    use super::FileIdentity;

    #[test]
    fn identities_differ_across_devices() {
        let a = FileIdentity::new(1, 42);
        let b = FileIdentity::new(2, 42);
        assert_ne!(a, b);
        assert!(!a.same_device(b));
        assert!(a.same_device(FileIdentity::new(1, 7)));
    }

    #[cfg(unix)]
    #[test]
    fn hardlinks_share_an_identity() {
        let temp = tempfile::tempdir().expect("tempdir");
        let original = temp.path().join("a");
        let link = temp.path().join("b");
        std::fs::write(&original, b"x").expect("write");
        std::fs::hard_link(&original, &link).expect("link");

        assert_eq!(
            FileIdentity::of(&original).expect("stat"),
            FileIdentity::of(&link).expect("stat")
        );
    }
}
