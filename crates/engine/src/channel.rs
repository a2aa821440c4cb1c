//! Channel catalogue of the Modal screen.

use api_types::{modal::ChannelId, user::Role};

/// Display metadata for one payment application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    /// Position in the "Aplikasi-N" numbering.
    pub ordinal: u8,
    pub label: &'static str,
}

impl Channel {
    pub fn title(&self) -> String {
        format!("Aplikasi-{} / {}", self.ordinal, self.label)
    }
}

const CHANNELS: [Channel; 7] = [
    Channel {
        id: ChannelId::Karangsari,
        ordinal: 1,
        label: "KARANGSARI",
    },
    Channel {
        id: ChannelId::Fastpay,
        ordinal: 2,
        label: "FASTPAY",
    },
    Channel {
        id: ChannelId::Mmbc,
        ordinal: 3,
        label: "MMBC",
    },
    Channel {
        id: ChannelId::Payfazz,
        ordinal: 4,
        label: "PAYFAZZ",
    },
    Channel {
        id: ChannelId::Posfin,
        ordinal: 5,
        label: "POSFIN",
    },
    Channel {
        id: ChannelId::BukuAgen,
        ordinal: 6,
        label: "BUKU AGEN/BUKU WARUNG",
    },
    Channel {
        id: ChannelId::ModalKas,
        ordinal: 7,
        label: "MODAL KAS",
    },
];

/// Channels the given role can see, in display order. `modal_kas` is owner-only.
pub fn visible_channels(role: Role) -> Vec<Channel> {
    CHANNELS
        .iter()
        .filter(|channel| channel.id != ChannelId::ModalKas || role.is_owner())
        .copied()
        .collect()
}

/// Label used in the history table.
pub fn label(id: ChannelId) -> &'static str {
    CHANNELS
        .iter()
        .find(|channel| channel.id == id)
        .map(|channel| channel.label)
        .unwrap_or("UNKNOWN")
}
