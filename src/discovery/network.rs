use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

/// Ports the backend is expected to listen on, in probe priority order.
/// The whole /24 is swept on the first port before the next is tried, so
/// an 8000 hit on any host beats a 5000 hit on any other.
pub const SCAN_PORTS: [u16; 3] = [8000, 5000, 3000];

/// IPv4 address of the interface that routes to the internet. Connecting
/// a UDP socket sends nothing; it only asks the OS to pick a route.
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(("8.8.8.8", 80)).ok()?;

    match socket.local_addr().ok()? {
        SocketAddr::V4(addr) => Some(*addr.ip()),
        SocketAddr::V6(_) => None,
    }
}

/// First three octets, e.g. `192.168.1` for `192.168.1.37`.
pub fn subnet_prefix(ip: Ipv4Addr) -> String {
    let octets = ip.octets();
    format!("{}.{}.{}", octets[0], octets[1], octets[2])
}

/// Candidate base URLs in strict port-major, host-minor order: every
/// host suffix 1..=255 on 8000, then all of them on 5000, then 3000.
pub fn candidate_urls(prefix: &str) -> impl Iterator<Item = String> + '_ {
    SCAN_PORTS
        .iter()
        .flat_map(move |port| (1u16..=255).map(move |host| format!("http://{prefix}.{host}:{port}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subnet_prefix_drops_last_octet() {
        assert_eq!(subnet_prefix(Ipv4Addr::new(192, 168, 1, 37)), "192.168.1");
        assert_eq!(subnet_prefix(Ipv4Addr::new(10, 0, 0, 254)), "10.0.0");
    }

    #[test]
    fn candidates_cover_every_host_and_port_once() {
        let urls: Vec<String> = candidate_urls("192.168.1").collect();
        assert_eq!(urls.len(), 255 * 3);
    }

    #[test]
    fn candidates_are_port_major() {
        let urls: Vec<String> = candidate_urls("192.168.1").collect();

        assert_eq!(urls[0], "http://192.168.1.1:8000");
        assert_eq!(urls[254], "http://192.168.1.255:8000");
        // The second port only starts after the whole subnet was swept
        // on the first one.
        assert_eq!(urls[255], "http://192.168.1.1:5000");
        assert_eq!(urls[510], "http://192.168.1.1:3000");
        assert_eq!(urls.last().unwrap(), "http://192.168.1.255:3000");

        assert!(urls[..255].iter().all(|url| url.ends_with(":8000")));
    }
}
