//! Capture replay from PCAP/PCAPNG files.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapNGReader, traits::PcapReaderIterator,
};
use tracing::debug;

use super::{FrameEvent, LinkKind, PacketSource, SourceError};

const READER_BUFFER_SIZE: usize = 64 * 1024;
const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

/// Replays a capture file frame by frame. The file's magic bytes select the
/// legacy or PCAPNG reader.
pub struct PcapFileSource {
    inner: Reader,
}

enum Reader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapFileSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let mut file = File::open(path)?;
        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)?;
        file.seek(SeekFrom::Start(0))?;

        let inner = if magic == PCAPNG_MAGIC {
            let reader =
                PcapNGReader::new(READER_BUFFER_SIZE, file).map_err(|e| SourceError::Capture {
                    context: "pcapng reader init",
                    message: e.to_string(),
                })?;
            Reader::Ng {
                reader,
                linktypes: Vec::new(),
            }
        } else {
            let reader =
                LegacyPcapReader::new(READER_BUFFER_SIZE, file).map_err(|e| {
                    SourceError::Capture {
                        context: "pcap reader init",
                        message: e.to_string(),
                    }
                })?;
            Reader::Legacy {
                reader,
                linktype: None,
            }
        };

        debug!(path = %path.display(), "capture file open");
        Ok(Self { inner })
    }
}

impl PacketSource for PcapFileSource {
    fn next_frame(&mut self) -> Result<Option<FrameEvent>, SourceError> {
        loop {
            match &mut self.inner {
                Reader::Legacy { reader, linktype } => match reader.next() {
                    Ok((offset, block)) => {
                        let event = match block {
                            PcapBlockOwned::LegacyHeader(header) => {
                                *linktype = Some(header.network);
                                None
                            }
                            PcapBlockOwned::Legacy(packet) => {
                                let ts = packet.ts_sec as f64 + (packet.ts_usec as f64 * 1e-6);
                                Some(FrameEvent {
                                    ts: Some(ts),
                                    link: link_kind(linktype.unwrap_or(Linktype::ETHERNET)),
                                    data: packet.data.to_vec(),
                                })
                            }
                            _ => None,
                        };
                        reader.consume(offset);
                        if event.is_some() {
                            return Ok(event);
                        }
                    }
                    Err(pcap_parser::PcapError::Eof) => return Ok(None),
                    Err(pcap_parser::PcapError::Incomplete(_)) => {
                        reader.refill().map_err(|e| SourceError::Capture {
                            context: "pcap reader refill",
                            message: e.to_string(),
                        })?;
                    }
                    Err(e) => {
                        return Err(SourceError::Capture {
                            context: "pcap reader next",
                            message: e.to_string(),
                        });
                    }
                },
                Reader::Ng { reader, linktypes } => match reader.next() {
                    Ok((offset, block)) => {
                        let event = match block {
                            PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                                linktypes.push(intf.linktype);
                                None
                            }
                            PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                                let ts = pcapng_ts_to_seconds(packet.ts_high, packet.ts_low);
                                let lt = linktypes
                                    .get(packet.if_id as usize)
                                    .copied()
                                    .unwrap_or(Linktype::ETHERNET);
                                Some(FrameEvent {
                                    ts: Some(ts),
                                    link: link_kind(lt),
                                    data: packet.data.to_vec(),
                                })
                            }
                            _ => None,
                        };
                        reader.consume(offset);
                        if event.is_some() {
                            return Ok(event);
                        }
                    }
                    Err(pcap_parser::PcapError::Eof) => return Ok(None),
                    Err(pcap_parser::PcapError::Incomplete(_)) => {
                        reader.refill().map_err(|e| SourceError::Capture {
                            context: "pcapng reader refill",
                            message: e.to_string(),
                        })?;
                    }
                    Err(e) => {
                        return Err(SourceError::Capture {
                            context: "pcapng reader next",
                            message: e.to_string(),
                        });
                    }
                },
            }
        }
    }
}

fn link_kind(linktype: Linktype) -> LinkKind {
    if linktype == Linktype::ETHERNET {
        LinkKind::Ethernet
    } else {
        LinkKind::Unsupported
    }
}

fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32) -> f64 {
    let ts = ((ts_high as u64) << 32) | (ts_low as u64);
    ts as f64 * 1e-6
}

#[cfg(test)]
mod tests {
    use super::PcapFileSource;
    use crate::source::{LinkKind, PacketSource};
    use std::io::Write;

    /// Minimal legacy pcap: global header (Ethernet linktype) plus one
    /// record per frame.
    fn write_legacy_pcap(frames: &[&[u8]]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0xa1b2_c3d4u32.to_le_bytes()); // magic
        bytes.extend_from_slice(&2u16.to_le_bytes()); // version major
        bytes.extend_from_slice(&4u16.to_le_bytes()); // version minor
        bytes.extend_from_slice(&0i32.to_le_bytes()); // thiszone
        bytes.extend_from_slice(&0u32.to_le_bytes()); // sigfigs
        bytes.extend_from_slice(&65535u32.to_le_bytes()); // snaplen
        bytes.extend_from_slice(&1u32.to_le_bytes()); // network: Ethernet
        for (i, frame) in frames.iter().enumerate() {
            bytes.extend_from_slice(&(100 + i as u32).to_le_bytes()); // ts_sec
            bytes.extend_from_slice(&0u32.to_le_bytes()); // ts_usec
            bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes()); // incl_len
            bytes.extend_from_slice(&(frame.len() as u32).to_le_bytes()); // orig_len
            bytes.extend_from_slice(frame);
        }
        file.write_all(&bytes).expect("write pcap");
        file
    }

    #[test]
    fn replays_frames_in_order() {
        let frames: [&[u8]; 2] = [&[0xaa; 20], &[0xbb; 14]];
        let file = write_legacy_pcap(&frames);

        let mut source = PcapFileSource::open(file.path()).expect("open");
        let first = source.next_frame().expect("read").expect("first frame");
        assert_eq!(first.link, LinkKind::Ethernet);
        assert_eq!(first.data, vec![0xaa; 20]);
        assert_eq!(first.ts, Some(100.0));

        let second = source.next_frame().expect("read").expect("second frame");
        assert_eq!(second.data, vec![0xbb; 14]);

        assert!(source.next_frame().expect("read").is_none());
    }

    #[test]
    fn open_missing_file_fails() {
        let missing = std::path::Path::new("does-not-exist.pcap");
        assert!(PcapFileSource::open(missing).is_err());
    }
}
