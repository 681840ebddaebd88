//! Supported key surface models
//!
//! Each model fixes the key grid geometry and the key image size. How keys
//! are addressed on the wire is left to the driver.

/// USB vendor id shared by all supported surfaces
pub const VENDOR_ID: u16 = 0x0fd9;

/// Largest key count of any supported model
pub const MAX_KEYS: usize = 32;

/// Key surface hardware model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceModel {
    /// 6 keys, 3x2, 80px
    Mini,
    /// 15 keys, 5x3, 72px, first generation
    Original,
    /// 15 keys, 5x3, 72px
    OriginalV2,
    /// 15 keys, 5x3, 72px
    Mk2,
    /// 32 keys, 8x4, 96px
    Xl,
}

impl DeviceModel {
    /// Look up a model from its USB product id
    pub fn from_product_id(pid: u16) -> Option<Self> {
        match pid {
            0x0063 => Some(DeviceModel::Mini),
            0x0060 => Some(DeviceModel::Original),
            0x006d => Some(DeviceModel::OriginalV2),
            0x0080 => Some(DeviceModel::Mk2),
            0x006c => Some(DeviceModel::Xl),
            _ => None,
        }
    }

    /// USB product id
    pub const fn product_id(self) -> u16 {
        match self {
            DeviceModel::Mini => 0x0063,
            DeviceModel::Original => 0x0060,
            DeviceModel::OriginalV2 => 0x006d,
            DeviceModel::Mk2 => 0x0080,
            DeviceModel::Xl => 0x006c,
        }
    }

    /// Number of physical keys
    pub const fn key_count(self) -> usize {
        self.columns() * self.rows()
    }

    /// Keys per row
    pub const fn columns(self) -> usize {
        match self {
            DeviceModel::Mini => 3,
            DeviceModel::Original | DeviceModel::OriginalV2 | DeviceModel::Mk2 => 5,
            DeviceModel::Xl => 8,
        }
    }

    /// Number of key rows
    pub const fn rows(self) -> usize {
        match self {
            DeviceModel::Mini => 2,
            DeviceModel::Original | DeviceModel::OriginalV2 | DeviceModel::Mk2 => 3,
            DeviceModel::Xl => 4,
        }
    }

    /// Edge length of a (square) key image in pixels
    pub const fn key_image_px(self) -> u32 {
        match self {
            DeviceModel::Mini => 80,
            DeviceModel::Original | DeviceModel::OriginalV2 | DeviceModel::Mk2 => 72,
            DeviceModel::Xl => 96,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_lookup() {
        let models = [
            DeviceModel::Mini,
            DeviceModel::Original,
            DeviceModel::OriginalV2,
            DeviceModel::Mk2,
            DeviceModel::Xl,
        ];

        for model in models {
            assert_eq!(DeviceModel::from_product_id(model.product_id()), Some(model));
            assert!(model.key_count() <= MAX_KEYS);
        }
        assert_eq!(DeviceModel::from_product_id(0x1234), None);
    }

    #[test]
    fn test_reference_geometry() {
        let model = DeviceModel::OriginalV2;
        assert_eq!(model.key_count(), 15);
        assert_eq!(model.columns(), 5);
        assert_eq!(model.key_image_px(), 72);
    }

    #[test]
    fn test_grid_geometry() {
        assert_eq!(DeviceModel::Mini.key_count(), 6);
        assert_eq!(DeviceModel::Mini.rows(), 2);
        assert_eq!(DeviceModel::Mini.key_image_px(), 80);

        // First generation only differs on the wire
        assert_eq!(DeviceModel::Original.key_count(), DeviceModel::Mk2.key_count());
        assert_eq!(DeviceModel::Original.key_image_px(), 72);

        assert_eq!(DeviceModel::Xl.key_count(), MAX_KEYS);
        assert_eq!(DeviceModel::Xl.columns(), 8);
        assert_eq!(DeviceModel::Xl.key_image_px(), 96);
    }
}
