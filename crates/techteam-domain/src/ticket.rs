//! Device-check and repair ticket enums.

string_enum! {
    pub enum DeviceType {
        Ipad => "ipad",
        Chromebook => "chromebook",
        Laptop => "laptop",
        PcLaptop => "pc_laptop",
        Macbook => "macbook",
    }
}

string_enum! {
    /// Discriminator between the two ticket forms sharing one table.
    pub enum IssueType {
        Check => "check",
        Repair => "repair",
    }
}

string_enum! {
    pub enum TicketStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Issue => "issue",
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        Self::Pending
    }
}

string_enum! {
    /// Repair urgency. Check tickets carry no priority.
    pub enum TicketPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

impl Default for TicketPriority {
    fn default() -> Self {
        Self::Medium
    }
}
