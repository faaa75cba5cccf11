// =============================================================================
// CATALOG MODULE
// =============================================================================
// This module holds the static hotel catalog the service boots with.
//
// The catalog is a preloaded reference dataset: hotels, their room types,
// and the full pool of physical room numbers per type. It is immutable
// for the lifetime of the process. Which rooms are FREE at any instant is
// never stored here; it is derived from the booking ledger (see
// allocation.rs), so cancelling or modifying a booking needs no catalog
// writes at all.
// =============================================================================

use crate::models::{Hotel, RoomType};

fn room_type(
    label: &str,
    max_guests: u32,
    total_rooms: u32,
    price_per_night: f64,
    amenities: &[&str],
) -> RoomType {
    RoomType {
        room_type: label.to_string(),
        max_guests,
        total_rooms,
        price_per_night,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        // Physical rooms are numbered 1..=total within their type
        room_numbers: (1..=total_rooms).collect(),
    }
}

/// Build the seed catalog: three hotels with fixed room inventories.
pub fn seed_hotels() -> Vec<Hotel> {
    vec![
        Hotel {
            id: "1".to_string(),
            name: "Grand Palace Hotel".to_string(),
            location: "New York".to_string(),
            description: "Luxurious accommodations in the heart of Manhattan with stunning city views.".to_string(),
            rating: 4.8,
            rooms: vec![
                room_type("Single", 1, 5, 100.0, &["TV", "WiFi", "Air Conditioning", "Coffee Maker"]),
                room_type("Double", 2, 3, 150.0, &["TV", "WiFi", "Air Conditioning", "Mini Bar"]),
                room_type("Suite", 4, 2, 250.0, &["TV", "WiFi", "Air Conditioning", "Mini Bar", "Jacuzzi"]),
            ],
        },
        Hotel {
            id: "2".to_string(),
            name: "Ocean View Resort".to_string(),
            location: "Los Angeles".to_string(),
            description: "Beachfront property with panoramic ocean views and premium amenities.".to_string(),
            rating: 4.7,
            rooms: vec![
                room_type("Single", 1, 4, 120.0, &["TV", "WiFi", "Air Conditioning", "Balcony"]),
                room_type("Double", 2, 4, 180.0, &["TV", "WiFi", "Air Conditioning", "Balcony", "Mini Bar"]),
                room_type("Suite", 4, 2, 280.0, &["TV", "WiFi", "Air Conditioning", "Balcony", "Mini Bar", "Kitchenette"]),
            ],
        },
        Hotel {
            id: "3".to_string(),
            name: "Mountain Escape Lodge".to_string(),
            location: "Denver".to_string(),
            description: "Rustic luxury in the Rocky Mountains with outdoor activities and spa services.".to_string(),
            rating: 4.9,
            rooms: vec![
                room_type("Single", 1, 6, 90.0, &["TV", "WiFi", "Heating", "Coffee Maker"]),
                room_type("Double", 2, 5, 140.0, &["TV", "WiFi", "Heating", "Fireplace"]),
                room_type("Suite", 4, 3, 220.0, &["TV", "WiFi", "Heating", "Fireplace", "Kitchenette", "Hot Tub"]),
            ],
        },
    ]
}
