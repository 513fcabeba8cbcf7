use std::net::Ipv4Addr;

use crate::net::{FlowId, FlowTuple, NodeId, Packet, TransportKind};
use crate::queue::{DEFAULT_PKT_BYTES, DropTailQueue, PacketQueue, UNBOUNDED_BYTES, mem_from_pkt};
use crate::sim::SimTime;

/// 载荷为 `payload` 的 UDP 包；线上大小为 payload + 30
fn udp_pkt(id: u64, payload: u32) -> Packet {
    let tuple = FlowTuple {
        src: NodeId(0),
        dst: NodeId(1),
        src_addr: Ipv4Addr::new(10, 1, 1, 1),
        dst_addr: Ipv4Addr::new(10, 1, 1, 2),
        dst_port: 9001,
        transport: TransportKind::Udp,
    };
    Packet::new(id, FlowId(0), tuple, payload, SimTime::ZERO)
}

#[test]
fn droptail_queue_enforces_capacity_and_preserves_order() {
    let mut q = DropTailQueue::new(100);
    assert_eq!(q.capacity_bytes(), 100);
    assert!(q.is_empty());

    assert!(q.enqueue(udp_pkt(1, 30)).is_ok());
    assert_eq!(q.len(), 1);
    assert_eq!(q.bytes(), 60);

    let dropped = q.enqueue(udp_pkt(2, 20)).expect_err("should drop");
    assert_eq!(dropped.id, 2);
    assert_eq!(q.len(), 1);
    assert_eq!(q.bytes(), 60);

    assert!(q.enqueue(udp_pkt(3, 10)).is_ok());
    assert_eq!(q.bytes(), 100);

    assert_eq!(q.dequeue().expect("pkt").id, 1);
    assert_eq!(q.dequeue().expect("pkt").id, 3);
    assert_eq!(q.bytes(), 0);
    assert!(q.dequeue().is_none());

    assert_eq!(q.drops(), 1);
    assert_eq!(q.peak_bytes(), 100);
}

#[test]
fn droptail_capacity_from_packet_count() {
    let mut q = DropTailQueue::with_packets(2);
    assert_eq!(q.capacity_bytes(), 2 * DEFAULT_PKT_BYTES);
    assert!(q.enqueue(udp_pkt(1, 1_470)).is_ok());
    assert!(q.enqueue(udp_pkt(2, 1_470)).is_ok());
    assert!(q.enqueue(udp_pkt(3, 1)).is_err());
    assert_eq!((q.len(), q.drops()), (2, 1));
}

#[test]
fn unbounded_droptail_never_drops() {
    let mut q = DropTailQueue::new(UNBOUNDED_BYTES);
    for id in 0..10_000 {
        assert!(q.enqueue(udp_pkt(id, 1_470)).is_ok());
    }
    assert_eq!(q.len(), 10_000);
    assert_eq!(q.bytes(), 10_000 * 1_500);
    assert_eq!(q.drops(), 0);
}

#[test]
fn mem_from_pkt_multiplies_default_packet_bytes_and_saturates() {
    assert_eq!(mem_from_pkt(0), 0);
    assert_eq!(mem_from_pkt(2), DEFAULT_PKT_BYTES * 2);
    assert_eq!(mem_from_pkt(u64::MAX), u64::MAX);
}
