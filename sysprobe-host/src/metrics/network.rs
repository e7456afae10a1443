//! Network interface enumeration
//!
//! This module handles:
//! - Interface listing in enumeration order with the up/down flag
//! - Bound addresses rendered in CIDR form (`192.168.1.10/24`)
//! - Hardware (MAC) address and MTU lookup
//!
//! Unix hosts combine `getifaddrs` links with if-addrs addresses; Windows
//! reads everything from `GetAdaptersAddresses`. Lookups that fail leave the
//! field at its default; enumeration failure yields an empty list.

use crate::models::{LinkStatus, NetworkInterfaceEntry};
use if_addrs::{get_if_addrs, IfAddr};
use mac_address::MacAddress;
use std::net::IpAddr;
use tracing::{debug, warn};

/// Link-level facts about one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    pub name: String,
    pub up: bool,
    pub mtu: u32,
    pub mac: String,
}

/// One bound address, keyed by interface name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundAddress {
    pub interface: String,
    pub cidr: String,
}

/// One adapter as described by `GetAdaptersAddresses`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRecord {
    pub name: String,
    pub oper_up: bool,
    pub mtu: u32,
    pub physical_address: Vec<u8>,
    pub addresses: Vec<String>,
}

/// Render `ip/prefix`, the prefix being the number of set netmask bits
pub fn cidr(ip: IpAddr, netmask: IpAddr) -> String {
    let prefix = match netmask {
        IpAddr::V4(mask) => u32::from(mask).count_ones(),
        IpAddr::V6(mask) => u128::from(mask).count_ones(),
    };
    format!("{}/{}", ip, prefix)
}

/// Lowercase colon-separated hex
pub fn format_mac(mac: &MacAddress) -> String {
    format_hardware_address(&mac.bytes())
}

/// Lowercase colon-separated hex of any length ("" when empty)
pub fn format_hardware_address(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Interface an IPv4 alias label (`eth0:1`) belongs to
pub fn parent_interface(name: &str) -> &str {
    match name.split_once(':') {
        Some((parent, _)) if !parent.is_empty() => parent,
        _ => name,
    }
}

/// Group `(name, up)` entries by parent interface, OR-ing the up flags
pub fn merge_link_flags(entries: impl IntoIterator<Item = (String, bool)>) -> Vec<(String, bool)> {
    let mut merged: Vec<(String, bool)> = Vec::new();
    for (name, up) in entries {
        let parent = parent_interface(&name);
        match merged.iter_mut().find(|(seen, _)| seen == parent) {
            Some((_, seen_up)) => *seen_up |= up,
            None => merged.push((parent.to_string(), up)),
        }
    }
    merged
}

/// Join links with their addresses, keeping link enumeration order;
/// alias addresses are listed under their parent
pub fn assemble(links: Vec<LinkInfo>, addresses: &[BoundAddress]) -> Vec<NetworkInterfaceEntry> {
    links
        .into_iter()
        .map(|link| {
            let ip_addresses = addresses
                .iter()
                .filter(|addr| parent_interface(&addr.interface) == link.name)
                .map(|addr| addr.cidr.clone())
                .collect();

            NetworkInterfaceEntry {
                ip_addresses,
                mac_address: link.mac,
                mtu: link.mtu,
                status: LinkStatus::from_up_flag(link.up),
                name: link.name,
            }
        })
        .collect()
}

/// One entry per adapter, in enumeration order
pub fn from_adapters(adapters: Vec<AdapterRecord>) -> Vec<NetworkInterfaceEntry> {
    adapters
        .into_iter()
        .map(|adapter| NetworkInterfaceEntry {
            mac_address: format_hardware_address(&adapter.physical_address),
            ip_addresses: adapter.addresses,
            mtu: adapter.mtu,
            status: LinkStatus::from_up_flag(adapter.oper_up),
            name: adapter.name,
        })
        .collect()
}

/// Every address the host reports, in enumeration order
pub fn bound_addresses() -> Vec<BoundAddress> {
    match get_if_addrs() {
        Ok(if_addrs) => if_addrs
            .into_iter()
            .map(|if_addr| {
                let cidr = match &if_addr.addr {
                    IfAddr::V4(v4) => cidr(IpAddr::V4(v4.ip), IpAddr::V4(v4.netmask)),
                    IfAddr::V6(v6) => cidr(IpAddr::V6(v6.ip), IpAddr::V6(v6.netmask)),
                };
                BoundAddress {
                    interface: if_addr.name,
                    cidr,
                }
            })
            .collect(),
        Err(e) => {
            debug!("Address enumeration failed: {}", e);
            Vec::new()
        }
    }
}

/// MAC address for a specific interface name ("" when none)
pub fn interface_mac(interface_name: &str) -> String {
    match mac_address::mac_address_by_name(interface_name) {
        Ok(Some(mac)) => format_mac(&mac),
        Ok(None) => {
            debug!("No MAC found for interface: {}", interface_name);
            String::new()
        }
        Err(e) => {
            debug!("Error getting MAC for {}: {}", interface_name, e);
            String::new()
        }
    }
}

/// Interfaces from `getifaddrs`, aliases folded into their parent
#[cfg(unix)]
pub fn unix_links(mtu_of: impl Fn(&str) -> u32) -> Vec<LinkInfo> {
    use nix::ifaddrs::getifaddrs;
    use nix::net::if_::InterfaceFlags;

    let addrs = match getifaddrs() {
        Ok(addrs) => addrs,
        Err(e) => {
            warn!("Failed to enumerate network interfaces: {}", e);
            return Vec::new();
        }
    };

    let links = merge_link_flags(
        addrs.map(|ifaddr| (ifaddr.interface_name, ifaddr.flags.contains(InterfaceFlags::IFF_UP))),
    );
    debug!("Found {} network interfaces", links.len());

    links
        .into_iter()
        .map(|(name, up)| LinkInfo {
            up,
            mtu: mtu_of(&name),
            mac: interface_mac(&name),
            name,
        })
        .collect()
}

/// Query an interface's MTU with the `SIOCGIFMTU` ioctl
#[cfg(any(target_os = "linux", target_os = "macos", target_os = "ios"))]
pub fn ioctl_mtu(interface: &str) -> Option<u32> {
    use nix::libc;
    use nix::sys::socket::{socket, AddressFamily, SockFlag, SockType};
    use std::os::fd::AsRawFd;

    let name = interface.as_bytes();
    if name.is_empty() || name.len() >= libc::IFNAMSIZ {
        return None;
    }

    let sock = match socket(AddressFamily::Inet, SockType::Datagram, SockFlag::empty(), None) {
        Ok(sock) => sock,
        Err(e) => {
            debug!("Cannot open socket for MTU lookup: {}", e);
            return None;
        }
    };

    // SAFETY: `req` is zero-initialized with a NUL-terminated name shorter than
    // IFNAMSIZ, and SIOCGIFMTU only writes the MTU member of the union.
    let mut req: libc::ifreq = unsafe { std::mem::zeroed() };
    for (dst, src) in req.ifr_name.iter_mut().zip(name) {
        *dst = *src as libc::c_char;
    }
    if unsafe { libc::ioctl(sock.as_raw_fd(), libc::SIOCGIFMTU, &mut req) } < 0 {
        debug!(
            "SIOCGIFMTU({}) failed: {}",
            interface,
            std::io::Error::last_os_error()
        );
        return None;
    }

    let mtu = unsafe { req.ifr_ifru.ifru_mtu };
    u32::try_from(mtu).ok()
}

#[cfg(all(unix, not(any(target_os = "linux", target_os = "macos", target_os = "ios"))))]
pub fn ioctl_mtu(interface: &str) -> Option<u32> {
    debug!("No MTU source for {} on this platform", interface);
    None
}

/// Adapters from `GetAdaptersAddresses`, including those without addresses
#[cfg(windows)]
pub fn windows_adapters() -> Vec<AdapterRecord> {
    use std::net::{Ipv4Addr, Ipv6Addr};
    use winapi::shared::ifdef::IfOperStatusUp;
    use winapi::shared::winerror::{ERROR_BUFFER_OVERFLOW, ERROR_SUCCESS};
    use winapi::shared::ws2def::{AF_INET, AF_INET6, AF_UNSPEC, SOCKADDR_IN};
    use winapi::shared::ws2ipdef::SOCKADDR_IN6_LH;
    use winapi::um::iphlpapi::GetAdaptersAddresses;
    use winapi::um::iptypes::{
        GAA_FLAG_SKIP_ANYCAST, GAA_FLAG_SKIP_DNS_SERVER, GAA_FLAG_SKIP_MULTICAST,
        IP_ADAPTER_ADDRESSES_LH,
    };

    const INITIAL_BUFFER_BYTES: u32 = 15 * 1024;
    const MAX_ATTEMPTS: usize = 3;

    let flags = GAA_FLAG_SKIP_ANYCAST | GAA_FLAG_SKIP_MULTICAST | GAA_FLAG_SKIP_DNS_SERVER;
    let mut size = INITIAL_BUFFER_BYTES;
    let mut buffer: Vec<u64> = Vec::new();
    let mut ret = ERROR_BUFFER_OVERFLOW;

    for _ in 0..MAX_ATTEMPTS {
        buffer = vec![0u64; (size as usize + 7) / 8];
        // SAFETY: the buffer is 8-byte aligned and at least `size` bytes long.
        ret = unsafe {
            GetAdaptersAddresses(
                AF_UNSPEC as u32,
                flags,
                std::ptr::null_mut(),
                buffer.as_mut_ptr() as *mut IP_ADAPTER_ADDRESSES_LH,
                &mut size,
            )
        };
        if ret != ERROR_BUFFER_OVERFLOW {
            break;
        }
    }

    if ret != ERROR_SUCCESS {
        warn!("GetAdaptersAddresses failed with code {}", ret);
        return Vec::new();
    }

    let mut adapters = Vec::new();
    let mut current = buffer.as_ptr() as *const IP_ADAPTER_ADDRESSES_LH;

    // SAFETY: on success the buffer holds a linked list of adapter records whose
    // pointers stay valid while `buffer` is alive.
    unsafe {
        while !current.is_null() {
            let adapter = &*current;

            let mut addresses = Vec::new();
            let mut unicast = adapter.FirstUnicastAddress;
            while !unicast.is_null() {
                let entry = &*unicast;
                let sockaddr = entry.Address.lpSockaddr;
                if !sockaddr.is_null() {
                    let prefix = entry.OnLinkPrefixLength;
                    match i32::from((*sockaddr).sa_family) {
                        family if family == AF_INET => {
                            let v4 = &*(sockaddr as *const SOCKADDR_IN);
                            let ip = Ipv4Addr::from(u32::from_be(*v4.sin_addr.S_un.S_addr()));
                            addresses.push(format!("{}/{}", ip, prefix));
                        }
                        family if family == AF_INET6 => {
                            let v6 = &*(sockaddr as *const SOCKADDR_IN6_LH);
                            let ip = Ipv6Addr::from(*v6.sin6_addr.u.Byte());
                            addresses.push(format!("{}/{}", ip, prefix));
                        }
                        _ => {}
                    }
                }
                unicast = entry.Next;
            }

            let hw_len = (adapter.PhysicalAddressLength as usize).min(adapter.PhysicalAddress.len());

            adapters.push(AdapterRecord {
                name: wide_to_string(adapter.FriendlyName),
                oper_up: adapter.OperStatus == IfOperStatusUp,
                mtu: adapter.Mtu,
                physical_address: adapter.PhysicalAddress[..hw_len].to_vec(),
                addresses,
            });

            current = adapter.Next;
        }
    }

    debug!("Found {} network adapters", adapters.len());
    adapters
}

/// Read a NUL-terminated UTF-16 string
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated UTF-16 buffer.
#[cfg(windows)]
unsafe fn wide_to_string(ptr: *const u16) -> String {
    if ptr.is_null() {
        return String::new();
    }
    let mut len = 0;
    while *ptr.add(len) != 0 {
        len += 1;
    }
    String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len))
}

/// Parse a sysfs `mtu` file ("1500\n")
pub fn parse_mtu(content: &str) -> Option<u32> {
    content.trim().parse().ok()
}
