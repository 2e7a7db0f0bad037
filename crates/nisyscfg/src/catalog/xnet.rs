//! NI-XNET expert properties for interfaces and search filters.

use crate::catalog::enums::XnetProtocol;

property_bag! {
    pub bag XnetResourceBag("XNET"), attributes XnetAttributes {
        PROTOCOL: XnetProtocol = 302039040, ReadOnly get protocol;
        PORT_NUMBER: u32 = 302043136, ReadOnly get port_number;
        DEVICE_SERIAL_NUMBER: String = 302047232, ReadOnly get device_serial_number;
        CAN_TERMINATION_SUPPORTED: bool = 302051328, ReadOnly get can_termination_supported;
        LIN_SLEEP_SUPPORTED: bool = 302055424, ReadOnly get lin_sleep_supported;
        IS_DUAL_CHANNEL: bool = 302059520, ReadOnly get is_dual_channel;
        MAX_QUEUE_SIZE: u32 = 302063616, ReadOnly get max_queue_size;
    }
}

property_bag! {
    pub bag XnetFilterBag("XNET filter"), attributes XnetFilterAttributes {
        PROTOCOL: XnetProtocol = 302039040, WriteOnly set set_protocol;
        PORT_NUMBER: u32 = 302043136, WriteOnly set set_port_number;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyBag;

    #[test]
    fn test_filter_and_resource_share_ids() {
        assert_eq!(XnetFilterBag::PROTOCOL.id, XnetResourceBag::PROTOCOL.id);
        assert_eq!(XnetFilterBag::PORT_NUMBER.id, XnetResourceBag::PORT_NUMBER.id);
        assert_eq!(XnetFilterBag::catalog().len(), 2);
    }
}
