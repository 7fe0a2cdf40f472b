pub mod fs_voucher_storage;
