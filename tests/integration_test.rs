// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end tests over synthetic map buffers assembled by hand, since no
//! real compiled map is available in this test environment. Byte layouts
//! here mirror the `#[binread]` structs in `src/payload/` and `src/header.rs`
//! field-for-field; default Cargo features (`strict_ce`) are assumed.

use tagmend::classes;
use tagmend::header::META_MEMORY_OFFSET;
use tagmend::tag_index::TagId;

const INTEGRITY_HEAD: u32 = u32::from_le_bytes(*b"deah");
const INTEGRITY_FOOT: u32 = u32::from_le_bytes(*b"toof");
const HEADER_SIZE: usize = 0x800;
const ENTRY_SIZE: usize = 28;

fn tag_id_bytes(id: TagId) -> [u8; 4] {
    let mut bytes = [0u8; 4];
    bytes[0..2].copy_from_slice(&id.table_index.to_le_bytes());
    bytes[2..4].copy_from_slice(&id.salt.to_le_bytes());
    bytes
}

const NULL_ID: TagId = TagId {
    table_index: 0,
    salt: 0,
};

/// Assembles payload bytes for one tag, recording where pending blob
/// references (reflexive array pointers) need to be patched once the final
/// buffer layout is known.
#[derive(Default)]
struct PayloadBuilder {
    bytes: Vec<u8>,
    blob_refs: Vec<(usize, usize)>,
}

impl PayloadBuilder {
    fn new() -> Self {
        Self::default()
    }

    fn u16(mut self, v: u16) -> Self {
        self.bytes.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn u32(mut self, v: u32) -> Self {
        self.bytes.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn tag_id(mut self, id: TagId) -> Self {
        self.bytes.extend_from_slice(&tag_id_bytes(id));
        self
    }

    /// A `Dependency` field: carried class plus identifier, with the
    /// secondary/tertiary classes and name pointer left zero.
    fn dependency(self, main_class: u32, id: TagId) -> Self {
        self.u32(main_class).u32(0).u32(0).u32(0).tag_id(id)
    }

    fn null_dependency(self) -> Self {
        self.dependency(0, NULL_ID)
    }

    /// An empty `Reflexive` (count zero, no referent).
    fn reflexive_empty(self) -> Self {
        self.u32(0).u32(0).u32(0)
    }

    /// A `Reflexive` whose `offset` points at blob `blob_id`, patched in
    /// once the blob's final position in the buffer is known.
    fn reflexive_blob(mut self, count: u32, blob_id: usize) -> Self {
        self.bytes.extend_from_slice(&count.to_le_bytes());
        let local_offset = self.bytes.len();
        self.blob_refs.push((local_offset, blob_id));
        self.bytes.extend_from_slice(&0u32.to_le_bytes());
        self.bytes.extend_from_slice(&0u32.to_le_bytes());
        self
    }
}

struct PendingTag {
    class_primary: u32,
    payload: Vec<u8>,
    not_in_map: bool,
    blob_refs: Vec<(usize, usize)>,
}

/// Builds a synthetic map buffer: header, index header, tag table, tag
/// payloads, and any array blobs they reference, wired up with correctly
/// translated main-space pointers.
#[derive(Default)]
struct MapBuilder {
    tags: Vec<PendingTag>,
    blobs: Vec<Vec<u8>>,
    name_patches: Vec<(usize, usize)>,
    version: u32,
}

impl MapBuilder {
    fn new() -> Self {
        Self {
            version: 1,
            ..Self::default()
        }
    }

    fn ce_variant(mut self) -> Self {
        self.version = tagmend::header::CE_VARIANT_VERSION;
        self
    }

    fn add_tag(&mut self, class_primary: u32, payload: PayloadBuilder) -> TagId {
        let index = self.tags.len() as u16;
        self.tags.push(PendingTag {
            class_primary,
            payload: payload.bytes,
            not_in_map: false,
            blob_refs: payload.blob_refs,
        });
        TagId {
            table_index: index,
            salt: 1,
        }
    }

    fn mark_not_in_map(&mut self, id: TagId) {
        self.tags[id.table_index as usize].not_in_map = true;
    }

    fn add_blob(&mut self, bytes: Vec<u8>) -> usize {
        self.blobs.push(bytes);
        self.blobs.len() - 1
    }

    fn name_tag(&mut self, id: TagId, name: &str) {
        let mut bytes = name.as_bytes().to_vec();
        bytes.push(0);
        let blob_id = self.add_blob(bytes);
        self.name_patches.push((id.table_index as usize, blob_id));
    }

    fn build(&self, scenario: TagId) -> Vec<u8> {
        let index_offset = HEADER_SIZE as u32;
        let main_magic = META_MEMORY_OFFSET.wrapping_sub(index_offset);
        let table_offset = HEADER_SIZE + 12;
        let table_bytes = self.tags.len() * ENTRY_SIZE;
        let payload_base = table_offset + table_bytes;

        let mut payload_offsets = Vec::with_capacity(self.tags.len());
        let mut cursor = payload_base;
        for tag in &self.tags {
            payload_offsets.push(cursor);
            cursor += tag.payload.len();
        }

        let mut blob_offsets = Vec::with_capacity(self.blobs.len());
        for blob in &self.blobs {
            blob_offsets.push(cursor);
            cursor += blob.len();
        }
        let total_len = cursor;

        let mut buffer = vec![0u8; total_len];

        buffer[0..4].copy_from_slice(&INTEGRITY_HEAD.to_le_bytes());
        buffer[4..8].copy_from_slice(&self.version.to_le_bytes());
        buffer[8..12].copy_from_slice(&(total_len as u32).to_le_bytes());
        buffer[12..16].copy_from_slice(&index_offset.to_le_bytes());
        buffer[16..20].copy_from_slice(&(total_len as u32 - index_offset).to_le_bytes());
        buffer[HEADER_SIZE - 4..HEADER_SIZE].copy_from_slice(&INTEGRITY_FOOT.to_le_bytes());

        let tag_index_pointer = main_magic.wrapping_add(table_offset as u32);
        buffer[HEADER_SIZE..HEADER_SIZE + 4].copy_from_slice(&tag_index_pointer.to_le_bytes());
        buffer[HEADER_SIZE + 4..HEADER_SIZE + 8].copy_from_slice(&tag_id_bytes(scenario));
        buffer[HEADER_SIZE + 8..HEADER_SIZE + 12].copy_from_slice(&(self.tags.len() as u32).to_le_bytes());

        for (i, tag) in self.tags.iter().enumerate() {
            let entry_offset = table_offset + i * ENTRY_SIZE;
            let payload_offset_buf = payload_offsets[i];
            let payload_pointer = main_magic.wrapping_add(payload_offset_buf as u32);
            let id = TagId {
                table_index: i as u16,
                salt: 1,
            };

            buffer[entry_offset..entry_offset + 4].copy_from_slice(&tag.class_primary.to_le_bytes());
            buffer[entry_offset + 12..entry_offset + 16].copy_from_slice(&tag_id_bytes(id));
            buffer[entry_offset + 20..entry_offset + 24].copy_from_slice(&payload_pointer.to_le_bytes());
            buffer[entry_offset + 24..entry_offset + 28].copy_from_slice(&(tag.not_in_map as u32).to_le_bytes());

            let p = payload_offset_buf;
            buffer[p..p + tag.payload.len()].copy_from_slice(&tag.payload);

            for &(local_offset, blob_id) in &tag.blob_refs {
                let pointer = main_magic.wrapping_add(blob_offsets[blob_id] as u32);
                let at = p + local_offset;
                buffer[at..at + 4].copy_from_slice(&pointer.to_le_bytes());
            }
        }

        for (blob, &offset) in self.blobs.iter().zip(blob_offsets.iter()) {
            buffer[offset..offset + blob.len()].copy_from_slice(blob);
        }

        for &(tag_index, blob_id) in &self.name_patches {
            let entry_offset = table_offset + tag_index * ENTRY_SIZE;
            let pointer = main_magic.wrapping_add(blob_offsets[blob_id] as u32);
            buffer[entry_offset + 16..entry_offset + 20].copy_from_slice(&pointer.to_le_bytes());
        }

        buffer
    }
}

/// A minimal `scnr` payload with every palette empty.
fn empty_scenario_payload() -> PayloadBuilder {
    let mut builder = PayloadBuilder::new();
    for _ in 0..14 {
        builder = builder.reflexive_empty();
    }
    builder
}

/// Builds a `scnr` payload where `biped_palette` (field index 1) points at
/// `blob_id`, a contiguous array of `count` `TagId`s.
fn scenario_payload_biped_palette(count: u32, blob_id: usize) -> PayloadBuilder {
    PayloadBuilder::new()
        .reflexive_empty() // scenery_palette
        .reflexive_blob(count, blob_id) // biped_palette
        .reflexive_empty() // equip_palette
        .reflexive_empty() // vehicle_palette
        .reflexive_empty() // weapon_palette
        .reflexive_empty() // machine_palette
        .reflexive_empty() // control_palette
        .reflexive_empty() // light_fixture_palette
        .reflexive_empty() // sound_scenery_palette
        .reflexive_empty() // starting_equipment
        .reflexive_empty() // skies
        .reflexive_empty() // bsps
        .reflexive_empty() // decal_palette
        .reflexive_empty() // netgame_item_collections
}

/// A minimal `obje`-family payload: discriminant plus five null references
/// and three empty reflexives (60 bytes).
fn object_payload(object_type: u16) -> PayloadBuilder {
    PayloadBuilder::new()
        .u16(object_type)
        .u16(0) // pad
        .tag_id(NULL_ID) // model
        .tag_id(NULL_ID) // animation
        .tag_id(NULL_ID) // collision
        .tag_id(NULL_ID) // physics
        .tag_id(NULL_ID) // shader
        .reflexive_empty() // widgets
        .reflexive_empty() // attachments
        .reflexive_empty() // resources
}

fn object_payload_with_collision(object_type: u16, collision: TagId) -> PayloadBuilder {
    PayloadBuilder::new()
        .u16(object_type)
        .u16(0)
        .tag_id(NULL_ID)
        .tag_id(NULL_ID)
        .tag_id(collision)
        .tag_id(NULL_ID)
        .tag_id(NULL_ID)
        .reflexive_empty()
        .reflexive_empty()
        .reflexive_empty()
}

fn collision_payload(effect_0: (u32, TagId), effect_1: (u32, TagId)) -> PayloadBuilder {
    let mut b = PayloadBuilder::new().dependency(effect_0.0, effect_0.1).dependency(effect_1.0, effect_1.1);
    for _ in 0..6 {
        b = b.null_dependency();
    }
    b.reflexive_empty()
}

fn font_payload(bold: TagId) -> PayloadBuilder {
    PayloadBuilder::new()
        .tag_id(bold)
        .tag_id(NULL_ID)
        .tag_id(NULL_ID)
        .tag_id(NULL_ID)
}

fn class_primary_at(buffer: &[u8], table_index: u16) -> u32 {
    let table_offset = HEADER_SIZE + 12;
    let entry_offset = table_offset + table_index as usize * ENTRY_SIZE;
    u32::from_le_bytes(buffer[entry_offset..entry_offset + 4].try_into().unwrap())
}

#[test]
fn deprotect_restores_scenario_only_buffer() {
    let mut builder = MapBuilder::new();
    let scenario = builder.add_tag(0, empty_scenario_payload());
    let buffer = builder.build(scenario);

    let out = tagmend::deprotect::deprotect(&buffer);
    assert_eq!(class_primary_at(&out, scenario.table_index), classes::SCNR);
    assert_eq!(out.len(), buffer.len());
}

#[test]
fn deprotect_resolves_generic_object_via_type_discriminant() {
    let mut builder = MapBuilder::new();

    // Reserve the inner object's id up front isn't necessary here: it has
    // no self-reference, so we can build tags in dependency order.
    let inner_object = builder.add_tag(0, object_payload(0)); // type 0 -> bipd

    let collision = builder.add_tag(
        0,
        collision_payload((classes::OBJE, inner_object), (0, NULL_ID)),
    );
    let outer_object = builder.add_tag(0, object_payload_with_collision(0, collision));

    let palette_blob = builder.add_blob(tag_id_bytes(outer_object).to_vec());
    let scenario = builder.add_tag(0, scenario_payload_biped_palette(1, palette_blob));

    let buffer = builder.build(scenario);
    let out = tagmend::deprotect::deprotect(&buffer);

    assert_eq!(class_primary_at(&out, scenario.table_index), classes::SCNR);
    assert_eq!(class_primary_at(&out, outer_object.table_index), classes::BIPD);
    assert_eq!(class_primary_at(&out, collision.table_index), classes::COLL);
    assert_eq!(class_primary_at(&out, inner_object.table_index), classes::BIPD);
}

#[test]
fn deprotect_first_reference_site_wins_on_conflicting_classes() {
    let mut builder = MapBuilder::new();

    let target = builder.add_tag(0, PayloadBuilder::new());
    // effect_0 carries `snd `, effect_1 carries `effe`, both pointing at the
    // same tag: the first visitation must win.
    let collision = builder.add_tag(0, collision_payload((classes::SND, target), (classes::EFFE, target)));
    // `object_type` is irrelevant here: the scenario's biped palette hints
    // a fixed class, so the discriminant byte is never consulted.
    let object = builder.add_tag(0, object_payload_with_collision(0, collision));

    let palette_blob = builder.add_blob(tag_id_bytes(object).to_vec());
    let scenario = builder.add_tag(0, scenario_payload_biped_palette(1, palette_blob));

    let buffer = builder.build(scenario);
    let out = tagmend::deprotect::deprotect(&buffer);

    assert_eq!(class_primary_at(&out, target.table_index), classes::SND);
}

#[test]
fn deprotect_terminates_self_referential_font_chain() {
    let mut builder = MapBuilder::new();

    // Reserve the font tag's own id, then build a payload that names it as
    // its own bold variant.
    let font = builder.add_tag(0, PayloadBuilder::new());
    builder.tags[font.table_index as usize].payload = font_payload(font).bytes;

    let globals = builder.add_tag(classes::MATG, PayloadBuilder::new());
    builder.name_tag(globals, "globals\\globals");

    // Route to the font through hud_globals, which is the simplest path
    // that reaches `walk_font` without needing the full interface-bitmaps
    // array shape.
    let hud_globals_payload = PayloadBuilder::new()
        .tag_id(NULL_ID) // messaging_bitmap
        .tag_id(font) // messaging_font
        .tag_id(NULL_ID) // button_icon_font
        .tag_id(NULL_ID) // text_font
        .tag_id(NULL_ID) // loading_begin_sound
        .tag_id(NULL_ID) // loading_end_sound
        .tag_id(NULL_ID) // message_text
        .tag_id(NULL_ID) // hud_messages
        .tag_id(NULL_ID); // default_weapon_hud
    let hud_globals = builder.add_tag(0, hud_globals_payload);

    // `GlobalsInterfaceBitmaps`: 11 TagIds in declaration order. Only
    // `hud_globals` (index 8) is set; the rest stay null.
    let mut interface_bitmaps = Vec::new();
    for i in 0..11 {
        let id = if i == 8 { hud_globals } else { NULL_ID };
        interface_bitmaps.extend_from_slice(&tag_id_bytes(id));
    }
    let interface_bitmaps_blob_id = builder.add_blob(interface_bitmaps);

    let globals_payload = PayloadBuilder::new()
        .reflexive_empty() // weapons
        .reflexive_empty() // powerups
        .reflexive_empty() // grenades
        .reflexive_empty() // camera_tracks
        .reflexive_empty() // player_information
        .reflexive_empty() // multiplayer_information
        .reflexive_blob(1, interface_bitmaps_blob_id); // interface_bitmaps
    builder.tags[globals.table_index as usize].payload = globals_payload.bytes;
    builder.tags[globals.table_index as usize].blob_refs = globals_payload.blob_refs;

    let scenario = builder.add_tag(0, empty_scenario_payload());

    let buffer = builder.build(scenario);
    let out = tagmend::deprotect::deprotect(&buffer);

    assert_eq!(class_primary_at(&out, font.table_index), classes::FONT);
    assert_eq!(class_primary_at(&out, globals.table_index), classes::MATG);
    assert_eq!(class_primary_at(&out, hud_globals.table_index), classes::HUDG);
}

#[test]
fn deprotect_walks_globals_weapons_without_reaching_globals_through_guard() {
    let mut builder = MapBuilder::new();

    let weapon = builder.add_tag(0, object_payload(2)); // type irrelevant, hint is fixed
    let globals = builder.add_tag(classes::MATG, PayloadBuilder::new());
    builder.name_tag(globals, "globals\\globals");

    let weapons_blob = builder.add_blob({
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&classes::WEAP.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&tag_id_bytes(weapon));
        bytes
    });

    let globals_payload = PayloadBuilder::new()
        .reflexive_blob(1, weapons_blob) // weapons
        .reflexive_empty() // powerups
        .reflexive_empty() // grenades
        .reflexive_empty() // camera_tracks
        .reflexive_empty() // player_information
        .reflexive_empty() // multiplayer_information
        .reflexive_empty(); // interface_bitmaps
    builder.tags[globals.table_index as usize].payload = globals_payload.bytes;
    builder.tags[globals.table_index as usize].blob_refs = globals_payload.blob_refs;

    let scenario = builder.add_tag(0, empty_scenario_payload());
    let buffer = builder.build(scenario);

    let out = tagmend::deprotect::deprotect(&buffer);
    assert_eq!(class_primary_at(&out, globals.table_index), classes::MATG);
    assert_eq!(class_primary_at(&out, weapon.table_index), classes::WEAP);
}

#[test]
fn deprotect_leaves_ce_external_tag_untouched() {
    const SENTINEL: u32 = 0x1111_1111;

    let mut builder = MapBuilder::new().ce_variant();
    let external = builder.add_tag(SENTINEL, PayloadBuilder::new());
    builder.mark_not_in_map(external);

    let palette_blob = builder.add_blob(tag_id_bytes(external).to_vec());
    let scenario = builder.add_tag(0, scenario_payload_biped_palette(1, palette_blob));

    let buffer = builder.build(scenario);
    let out = tagmend::deprotect::deprotect(&buffer);

    assert_eq!(class_primary_at(&out, external.table_index), SENTINEL);
}

#[test]
fn deprotect_is_idempotent() {
    let mut builder = MapBuilder::new();
    let inner_object = builder.add_tag(0, object_payload(3));
    let collision = builder.add_tag(0, collision_payload((classes::OBJE, inner_object), (0, NULL_ID)));
    let outer_object = builder.add_tag(0, object_payload_with_collision(0, collision));
    let palette_blob = builder.add_blob(tag_id_bytes(outer_object).to_vec());
    let scenario = builder.add_tag(0, scenario_payload_biped_palette(1, palette_blob));
    let buffer = builder.build(scenario);

    let once = tagmend::deprotect::deprotect(&buffer);
    let twice = tagmend::deprotect::deprotect(&once);
    assert_eq!(once, twice);
}

#[test]
fn deprotect_never_changes_buffer_length() {
    let mut builder = MapBuilder::new();
    let scenario = builder.add_tag(0, empty_scenario_payload());
    let buffer = builder.build(scenario);

    let out = tagmend::deprotect::deprotect(&buffer);
    assert_eq!(out.len(), buffer.len());
}
