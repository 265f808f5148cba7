use crate::net::{
    Context, DataPacket, MeshWorld, Node, NodeId, NodeSpec, Packet, Position, Role, RoutingPacket,
};
use crate::sim::{SimTime, Simulator};
use crate::topo::build_explicit;
use std::collections::HashMap;

fn chain_world(spacing_km: f64, roles: &[Role]) -> (Simulator, MeshWorld, Vec<NodeId>) {
    let mut sim = Simulator::default();
    let mut world = MeshWorld::new(Context::default());
    let specs: Vec<NodeSpec> = roles
        .iter()
        .enumerate()
        .map(|(i, &role)| NodeSpec {
            x: i as f64 * spacing_km,
            y: 0.0,
            role,
        })
        .collect();
    let ids = build_explicit(&mut sim, &mut world, &specs);
    (sim, world, ids)
}

fn data_packet(src: &str, dst: &str, via: &str, origin: SimTime) -> Packet {
    Packet::Data(DataPacket {
        src: src.to_string(),
        dst: dst.to_string(),
        via: via.to_string(),
        content: "ping".to_string(),
        origin,
    })
}

#[test]
fn can_send_requires_distance_within_sender_range() {
    let near = Node::new("a", Role::Normal, Position::new(0.0, 0.0), 3.0);
    let in_range = Node::new("b", Role::Normal, Position::new(3.0, 0.0), 3.0);
    let out_of_range = Node::new("c", Role::Normal, Position::new(3.0001, 0.0), 3.0);

    assert!(near.can_send(&in_range), "boundary distance is reachable");
    assert!(!near.can_send(&out_of_range));
    assert!(!near.can_send(&near), "a node never sends to itself");
}

#[test]
fn foreign_data_packet_is_dropped_and_only_drop_counter_moves() {
    let (mut sim, mut world, ids) =
        chain_world(1.0, &[Role::Normal, Role::Normal]);

    let pkt = data_packet("node-1", "somewhere-else", "someone-else", sim.now());
    world.net.deliver(ids[0], pkt, &mut sim);

    let stats = &world.net.node(ids[0]).expect("node present").stats;
    assert_eq!(stats.data_dropped, 1);
    assert_eq!(stats.data_received, 0);
    assert_eq!(stats.data_forwarded, 0);
    assert_eq!(stats.data_sent, 0);
    assert_eq!(world.net.statistics_snapshot().total_messages_received, 0);
}

#[test]
fn destination_receives_even_when_not_the_designated_hop() {
    let (mut sim, mut world, ids) =
        chain_world(1.0, &[Role::Normal, Role::Normal]);

    let pkt = data_packet("node-1", "node-0", "node-9", sim.now());
    world.net.deliver(ids[0], pkt, &mut sim);

    let stats = &world.net.node(ids[0]).expect("node present").stats;
    assert_eq!(stats.data_received, 1);
    assert_eq!(stats.data_dropped, 0);
    assert_eq!(world.net.statistics_snapshot().total_messages_received, 1);
}

#[test]
fn designated_hop_without_route_drops_instead_of_forwarding() {
    let (mut sim, mut world, ids) =
        chain_world(1.0, &[Role::Normal, Role::Normal]);

    // node-0 is the via but knows no route to the destination
    let pkt = data_packet("node-1", "node-7", "node-0", sim.now());
    world.net.deliver(ids[0], pkt, &mut sim);

    let stats = &world.net.node(ids[0]).expect("node present").stats;
    assert_eq!(stats.data_dropped, 1);
    assert_eq!(stats.data_forwarded, 0);
}

#[test]
fn designated_hop_forwards_toward_destination() {
    // 0 -- 1 -- 2, spaced so only neighbours hear each other
    let (mut sim, mut world, ids) = chain_world(
        3.0,
        &[Role::Normal, Role::Normal, Role::Gateway],
    );

    // teach node-1 its direct route to node-2
    world.net.advertise(ids[2], &mut sim);

    let pkt = data_packet("node-0", "node-2", "node-1", sim.now());
    world.net.deliver(ids[1], pkt, &mut sim);
    // the forwarded hop is a queued fan-out at the same instant
    sim.run_until(sim.now(), &mut world);

    assert_eq!(
        world.net.node(ids[1]).expect("node present").stats.data_forwarded,
        1
    );
    assert_eq!(
        world.net.node(ids[2]).expect("node present").stats.data_received,
        1
    );
}

#[test]
fn routing_packet_teaches_direct_and_transitive_routes() {
    let (mut sim, mut world, ids) =
        chain_world(2.0, &[Role::Normal, Role::Normal]);

    let mut advertised = HashMap::new();
    advertised.insert(
        "node-7".to_string(),
        crate::net::RouteAdvert {
            metric: 2,
            role: Role::Gateway,
        },
    );
    let pkt = Packet::Routing(RoutingPacket {
        src: "node-1".to_string(),
        role: Role::Sensor,
        routes: advertised,
    });
    world.net.deliver(ids[0], pkt, &mut sim);

    let node = world.net.node(ids[0]).expect("node present");
    assert_eq!(node.stats.routing_received, 1);

    let direct = node.routes.get("node-1").expect("direct neighbour learned");
    assert_eq!(direct.metric, 1);
    assert_eq!(direct.via, "node-1");
    assert_eq!(direct.role, Role::Sensor);

    let transitive = node.routes.get("node-7").expect("advertised route learned");
    assert_eq!(transitive.metric, 3, "advertised metric plus one");
    assert_eq!(transitive.via, "node-1");
    assert_eq!(transitive.role, Role::Gateway);
    // link quality of the transitive route is computed from the distance
    // to the advertising neighbour
    assert_eq!(transitive.snr, direct.snr);
}

#[test]
fn advertisement_never_creates_a_self_route() {
    let (mut sim, mut world, ids) =
        chain_world(2.0, &[Role::Normal, Role::Normal]);

    let mut advertised = HashMap::new();
    advertised.insert(
        "node-0".to_string(),
        crate::net::RouteAdvert {
            metric: 1,
            role: Role::Normal,
        },
    );
    let pkt = Packet::Routing(RoutingPacket {
        src: "node-1".to_string(),
        role: Role::Normal,
        routes: advertised,
    });
    world.net.deliver(ids[0], pkt, &mut sim);

    let node = world.net.node(ids[0]).expect("node present");
    assert!(
        !node.routes.contains("node-0"),
        "a node never holds a route to itself"
    );
}

#[test]
fn sensor_without_gateway_route_floods_as_initial_broadcast() {
    let (mut sim, mut world, ids) =
        chain_world(1.0, &[Role::Sensor, Role::Normal]);

    world.net.generate_data(ids[0], &mut sim);

    let sensor = world.net.node(ids[0]).expect("node present");
    assert_eq!(sensor.stats.data_sent, 1);
    let stats = world.net.statistics_snapshot();
    assert_eq!(stats.initial_broadcast_messages_sent, 1);
    assert_eq!(stats.total_messages_sent, 0);
    // the neighbour hears the flood but has no reason to keep it
    assert_eq!(
        world.net.node(ids[1]).expect("node present").stats.data_dropped,
        1
    );
}

#[test]
fn sensor_with_known_gateway_sends_toward_it() {
    let (mut sim, mut world, ids) =
        chain_world(1.0, &[Role::Sensor, Role::Gateway]);

    // gateway advertises, sensor learns the 1-hop route
    world.net.advertise(ids[1], &mut sim);
    world.net.generate_data(ids[0], &mut sim);

    let stats = world.net.statistics_snapshot();
    assert_eq!(stats.total_messages_sent, 1);
    assert_eq!(stats.total_messages_received, 1);
    assert_eq!(stats.initial_broadcast_messages_sent, 0);
    assert_eq!(
        world.net.node(ids[1]).expect("node present").stats.data_received,
        1
    );
}
