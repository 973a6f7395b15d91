use cityweather_core::{AppError, StorageError};
use cityweather_weather::FavoritesError;

/// Map a favorites persistence failure. `writing` selects the write-side
/// variant for I/O errors.
pub fn storage_error(e: &FavoritesError, writing: bool) -> AppError {
    let storage = match e {
        FavoritesError::Corrupt { .. } => StorageError::Corrupt(e.to_string()),
        FavoritesError::Io(_) | FavoritesError::Serialize(_) if writing => {
            StorageError::WriteFailed(e.to_string())
        }
        FavoritesError::Io(_) | FavoritesError::Serialize(_) => {
            StorageError::ReadFailed(e.to_string())
        }
    };
    AppError::Storage(storage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_value_maps_to_corrupt() {
        let e = FavoritesError::Corrupt {
            key: "favoriteCities".into(),
            message: "expected value".into(),
        };
        assert!(matches!(
            storage_error(&e, false),
            AppError::Storage(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_io_failure_depends_on_direction() {
        let io = || FavoritesError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(matches!(
            storage_error(&io(), true),
            AppError::Storage(StorageError::WriteFailed(_))
        ));
        assert!(matches!(
            storage_error(&io(), false),
            AppError::Storage(StorageError::ReadFailed(_))
        ));
    }
}
