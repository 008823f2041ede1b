use crate::config::Geometry;
use crate::error::{Result, SimError};

/// An access address split into its page index and in-page offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAddress {
    pub address: u64,
    pub page: usize,
    pub offset: usize,
}

impl PageAddress {
    /// Split `address` for the given geometry.
    ///
    /// Fails if the page lies beyond the last configured page.
    pub fn resolve(address: u64, geometry: &Geometry) -> Result<Self> {
        // usize -> u64 never truncates on supported targets
        let page_size = geometry.page_size as u64;
        let page = address / page_size;
        let offset = (address % page_size) as usize;

        match usize::try_from(page) {
            Ok(page) if page < geometry.num_pages => Ok(PageAddress {
                address,
                page,
                offset,
            }),
            _ => Err(SimError::AddressOutOfRange {
                address,
                page,
                num_pages: geometry.num_pages,
            }),
        }
    }
}

impl std::fmt::Display for PageAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "addr {} (page={}, offset={})",
            self.address, self.page, self.offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(page_size: usize, num_pages: usize) -> Geometry {
        Geometry::new(page_size, 2, num_pages, 0).unwrap()
    }

    #[test]
    fn test_split_first_page() {
        let a = PageAddress::resolve(3, &geometry(4, 4)).unwrap();
        assert_eq!(a.page, 0);
        assert_eq!(a.offset, 3);
    }

    #[test]
    fn test_split_page_boundaries() {
        let g = geometry(4, 4);
        assert_eq!(PageAddress::resolve(4, &g).unwrap().page, 1);
        assert_eq!(PageAddress::resolve(4, &g).unwrap().offset, 0);
        assert_eq!(PageAddress::resolve(8, &g).unwrap().page, 2);
        assert_eq!(PageAddress::resolve(15, &g).unwrap().page, 3);
        assert_eq!(PageAddress::resolve(15, &g).unwrap().offset, 3);
    }

    #[test]
    fn test_split_non_power_of_two_page_size() {
        let a = PageAddress::resolve(100, &geometry(30, 10)).unwrap();
        assert_eq!(a.page, 3);
        assert_eq!(a.offset, 10);
        // p * page_size + offset reconstructs the address
        assert_eq!((a.page * 30 + a.offset) as u64, a.address);
    }

    #[test]
    fn test_address_beyond_last_page() {
        let err = PageAddress::resolve(16, &geometry(4, 4)).unwrap_err();
        match err {
            SimError::AddressOutOfRange {
                address,
                page,
                num_pages,
            } => {
                assert_eq!(address, 16);
                assert_eq!(page, 4);
                assert_eq!(num_pages, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_huge_address_rejected() {
        assert!(PageAddress::resolve(u64::MAX, &geometry(1, 4)).is_err());
    }

    #[test]
    fn test_display() {
        let a = PageAddress::resolve(13, &geometry(4, 4)).unwrap();
        let display = format!("{}", a);
        assert!(display.contains("13"));
        assert!(display.contains("page=3"));
        assert!(display.contains("offset=1"));
    }
}
