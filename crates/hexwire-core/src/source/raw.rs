//! Live capture from a Linux `AF_PACKET` raw socket.
//!
//! Frames arrive complete with their Ethernet header, exactly as the
//! dissector expects. Opening the socket requires `CAP_NET_RAW`.

use std::ffi::CString;
use std::io;

use time::OffsetDateTime;
use tracing::{debug, info};

use super::{FrameEvent, LinkKind, PacketSource, SourceError};
use crate::MAX_FRAME_LEN;

/// Blocking capture of every frame the host sees, optionally bound to one
/// interface. The descriptor is closed on drop.
pub struct RawSocketSource {
    fd: libc::c_int,
    buffer: Vec<u8>,
}

impl RawSocketSource {
    /// Open the capture socket; with `interface` given, bind to that device
    /// only, otherwise receive from every interface.
    pub fn open(interface: Option<&str>) -> Result<Self, SourceError> {
        let fd = unsafe {
            libc::socket(
                libc::AF_PACKET,
                libc::SOCK_RAW,
                (libc::ETH_P_ALL as u16).to_be() as libc::c_int,
            )
        };
        if fd < 0 {
            return Err(SourceError::Io(io::Error::last_os_error()));
        }

        let source = Self {
            fd,
            buffer: vec![0u8; MAX_FRAME_LEN],
        };
        if let Some(name) = interface {
            source.bind_interface(name)?;
        }
        info!(interface = interface.unwrap_or("<all>"), "raw socket open");
        Ok(source)
    }

    fn bind_interface(&self, name: &str) -> Result<(), SourceError> {
        let mut sockaddr: libc::sockaddr_ll = unsafe { std::mem::zeroed() };
        sockaddr.sll_family = libc::AF_PACKET as u16;
        sockaddr.sll_protocol = (libc::ETH_P_ALL as u16).to_be();
        sockaddr.sll_ifindex = interface_index(name)?;

        let res = unsafe {
            libc::bind(
                self.fd,
                &sockaddr as *const libc::sockaddr_ll as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };
        if res < 0 {
            return Err(SourceError::Io(io::Error::last_os_error()));
        }
        Ok(())
    }
}

fn interface_index(name: &str) -> Result<libc::c_int, SourceError> {
    let cname = CString::new(name).map_err(|_| SourceError::Capture {
        context: "interface name",
        message: "embedded NUL byte".to_string(),
    })?;
    let index = unsafe { libc::if_nametoindex(cname.as_ptr()) };
    if index == 0 {
        return Err(SourceError::Io(io::Error::last_os_error()));
    }
    Ok(index as libc::c_int)
}

impl PacketSource for RawSocketSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError> {
        let len = unsafe {
            libc::recv(
                self.fd,
                self.buffer.as_mut_ptr() as *mut libc::c_void,
                self.buffer.len(),
                0,
            )
        };
        if len < 0 {
            let err = io::Error::last_os_error();
            // A signal ends the capture instead of killing the session.
            if err.kind() == io::ErrorKind::Interrupted {
                info!("capture interrupted by signal");
                return Ok(None);
            }
            return Err(SourceError::Io(err));
        }

        let len = len as usize;
        debug!(len, "frame received");
        let now = OffsetDateTime::now_utc();
        let ts = now.unix_timestamp() as f64 + f64::from(now.nanosecond()) * 1e-9;
        Ok(Some(FrameEvent {
            ts: Some(ts),
            link: LinkKind::Ethernet,
            data: self.buffer[..len].to_vec(),
        }))
    }
}

impl Drop for RawSocketSource {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}
