// SPDX-License-Identifier: MIT

//! Maps a device path to the whole-disk "spindle" it lives on. Checking two
//! partitions of one disk concurrently causes destructive seek thrashing, so
//! the scheduler serializes everything that shares a base device.

/// Canonical whole-disk prefixes, in match order. A partition path such as
/// `/dev/sda1` resolves to `/dev/sda`.
const WHOLE_DISK_PREFIXES: &[&str] = &[
    "/dev/hda", "/dev/hdb", "/dev/hdc", "/dev/hdd", "/dev/hde", "/dev/hdf", "/dev/hdg",
    "/dev/hdh", "/dev/sda", "/dev/sdb", "/dev/sdc", "/dev/sdd", "/dev/sde", "/dev/sdf",
    "/dev/sdg", "/dev/sdh", "/dev/sdi", "/dev/sdj", "/dev/sdk", "/dev/sdl", "/dev/sdm",
    "/dev/sdn", "/dev/sdo", "/dev/sdp", "/dev/vda", "/dev/vdb", "/dev/vdc", "/dev/vdd",
    "/dev/vde", "/dev/vdf", "/dev/vdg", "/dev/vdh", "/dev/xvda", "/dev/xvdb", "/dev/xvdc",
    "/dev/xvdd", "/dev/xvde", "/dev/xvdf", "/dev/xvdg", "/dev/xvdh",
];

/// Returns the matching whole-disk prefix, or the path itself when nothing
/// matches (the device is its own spindle). Pure and total.
pub fn base_device(path: &str) -> &str {
    for prefix in WHOLE_DISK_PREFIXES {
        if path.starts_with(prefix) {
            return prefix;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_share_a_spindle() {
        assert_eq!(base_device("/dev/sda1"), "/dev/sda");
        assert_eq!(base_device("/dev/sda2"), "/dev/sda");
        assert_eq!(base_device("/dev/hdc3"), "/dev/hdc");
        assert_eq!(base_device("/dev/vdb12"), "/dev/vdb");
        assert_eq!(base_device("/dev/xvda1"), "/dev/xvda");
    }

    #[test]
    fn whole_disk_maps_to_itself() {
        assert_eq!(base_device("/dev/sdb"), "/dev/sdb");
    }

    #[test]
    fn unknown_devices_are_their_own_spindle() {
        assert_eq!(base_device("/dev/md0"), "/dev/md0");
        assert_eq!(base_device("/dev/mapper/vg-root"), "/dev/mapper/vg-root");
        assert_eq!(base_device("LABEL=data"), "LABEL=data");
    }

    #[test]
    fn different_disks_differ() {
        assert_ne!(base_device("/dev/sda1"), base_device("/dev/sdb1"));
    }
}
